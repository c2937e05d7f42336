pub(crate) mod acquisition;
pub(crate) mod device_common;
pub(crate) mod plate_solver;
pub(crate) mod response_common;
pub(crate) mod science_camera;
pub(crate) mod slider;
pub(crate) mod telescope;
#[cfg(test)]
mod tests;
