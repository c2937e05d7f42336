use strum_macros::{Display, EnumString};

/// Pipeline stage tag, exposed through the status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum RunStep {
    #[default]
    Scheduler,
    Slew,
    SlewOffset,
    Acq,
    Plate,
    SliderSci,
    Autoexpose,
    Takedata,
}
