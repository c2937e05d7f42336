use super::console_messenger::command_for;
use super::control_messages::{
    Downstream, DownstreamContent, GetStatus, Pause, Ping, Stage, Startup, Status, Step, Upstream,
    UpstreamContent,
};
use crate::run_control::{ControlCommand, RunMode, RunStatus, RunStep};
use prost::Message;

#[test]
fn test_upstream_maps_to_commands() {
    assert_eq!(command_for(&UpstreamContent::Pause(Pause {})), Some(ControlCommand::Pause));
    assert_eq!(command_for(&UpstreamContent::Step(Step {})), Some(ControlCommand::Step));
    assert_eq!(command_for(&UpstreamContent::Startup(Startup {})), Some(ControlCommand::Startup));
    assert_eq!(command_for(&UpstreamContent::GetStatus(GetStatus {})), None);
    assert_eq!(command_for(&UpstreamContent::Ping(Ping { echo: None })), None);
}

#[test]
fn test_upstream_frame_decodes() {
    let bytes =
        Upstream { content: Some(UpstreamContent::ResetScheduler(Default::default())) }
            .encode_to_vec();
    let decoded = Upstream::decode(bytes.as_slice()).unwrap();
    let content = decoded.content.unwrap();
    assert_eq!(command_for(&content), Some(ControlCommand::ResetScheduler));
}

#[test]
fn test_status_message_mirrors_run_status() {
    let status = RunStatus {
        step: RunStep::Plate,
        mode: RunMode::Running,
        auto_mode: false,
        waiting_on: vec![String::from("plate_solver"), String::from("single_step")],
        target: Some(String::from("STF 1 [V]")),
        ..RunStatus::default()
    };
    let msg = Status::from(&status);
    assert_eq!(msg.step(), Stage::Plate);
    assert!(msg.running);
    assert!(!msg.auto_mode);
    assert_eq!(msg.waiting_on.len(), 2);
    assert_eq!(msg.timestamp, status.timestamp.timestamp_millis());

    let frame = Downstream { content: Some(DownstreamContent::Status(msg.clone())) }.encode_to_vec();
    let decoded = Downstream::decode(frame.as_slice()).unwrap();
    assert_eq!(decoded.content, Some(DownstreamContent::Status(msg)));
}
