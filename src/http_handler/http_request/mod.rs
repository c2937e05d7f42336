pub(crate) mod acquisition;
pub(crate) mod device_common;
pub(crate) mod focuser;
pub(crate) mod plate_solver;
pub(crate) mod request_common;
pub(crate) mod science_camera;
pub(crate) mod slider;
pub(crate) mod telescope;
