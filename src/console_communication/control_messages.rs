use crate::run_control::{RunMode, RunStatus, RunStep};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Upstream {
    #[prost(oneof = "UpstreamContent", tags = "1, 2, 3, 4, 5, 6, 7, 8")]
    pub content: Option<UpstreamContent>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Downstream {
    #[prost(oneof = "DownstreamContent", tags = "1, 2")]
    pub content: Option<DownstreamContent>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ping {
    #[prost(string, optional, tag = "1")]
    pub echo: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Pong {
    #[prost(string, optional, tag = "1")]
    pub echo: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Status {
    #[prost(int64, tag = "1")]
    pub timestamp: i64,
    #[prost(enumeration = "Stage", tag = "2")]
    pub step: i32,
    #[prost(bool, tag = "3")]
    pub running: bool,
    #[prost(bool, tag = "4")]
    pub auto_mode: bool,
    #[prost(string, repeated, tag = "5")]
    pub waiting_on: Vec<String>,
    #[prost(string, optional, tag = "6")]
    pub target: Option<String>,
}

impl From<&RunStatus> for Status {
    fn from(status: &RunStatus) -> Self {
        Self {
            timestamp: status.timestamp.timestamp_millis(),
            step: Stage::from(status.step).into(),
            running: status.mode == RunMode::Running,
            auto_mode: status.auto_mode,
            waiting_on: status.waiting_on.clone(),
            target: status.target.clone(),
        }
    }
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum DownstreamContent {
    #[prost(message, tag = "1")]
    Pong(Pong),
    #[prost(message, tag = "2")]
    Status(Status),
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum UpstreamContent {
    #[prost(message, tag = "1")]
    Ping(Ping),
    #[prost(message, tag = "2")]
    Pause(Pause),
    #[prost(message, tag = "3")]
    Resume(Resume),
    #[prost(message, tag = "4")]
    Step(Step),
    #[prost(message, tag = "5")]
    GetStatus(GetStatus),
    #[prost(message, tag = "6")]
    Startup(Startup),
    #[prost(message, tag = "7")]
    Shutdown(Shutdown),
    #[prost(message, tag = "8")]
    ResetScheduler(ResetScheduler),
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Pause {}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Resume {}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Step {}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct GetStatus {}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Startup {}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Shutdown {}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct ResetScheduler {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Stage {
    Scheduler = 0,
    Slew = 1,
    SlewOffset = 2,
    Acq = 3,
    Plate = 4,
    SliderSci = 5,
    Autoexpose = 6,
    Takedata = 7,
}

impl From<RunStep> for Stage {
    fn from(step: RunStep) -> Self {
        match step {
            RunStep::Scheduler => Self::Scheduler,
            RunStep::Slew => Self::Slew,
            RunStep::SlewOffset => Self::SlewOffset,
            RunStep::Acq => Self::Acq,
            RunStep::Plate => Self::Plate,
            RunStep::SliderSci => Self::SliderSci,
            RunStep::Autoexpose => Self::Autoexpose,
            RunStep::Takedata => Self::Takedata,
        }
    }
}
