//! Operator console: a TCP endpoint exchanging length-prefixed protobuf messages, and the
//! messenger that turns them into run manager commands.

mod console_endpoint;
mod console_messenger;
mod control_messages;
#[cfg(test)]
mod tests;

pub(crate) use console_messenger::ConsoleMessenger;
