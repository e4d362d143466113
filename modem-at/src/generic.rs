//! Built-in generic command table
//!
//! Commands every AT port answers regardless of the device table: echo
//! control, the S3 terminator register, and the bare `AT` probe. The device
//! table is consulted first, so a device may shadow any of these.

use crate::command::AtCommand;
use crate::error::CmdResult;
use crate::port::LineSettings;
use crate::respond::Responder;

fn e0_exec(_resp: &mut Responder<'_>, line: &mut LineSettings) -> CmdResult {
    line.echo = false;
    Ok(())
}

fn e1_exec(_resp: &mut Responder<'_>, line: &mut LineSettings) -> CmdResult {
    line.echo = true;
    Ok(())
}

fn s3_read(resp: &mut Responder<'_>, line: &mut LineSettings) -> CmdResult {
    resp.linef(format_args!("{:03}", line.terminator))
}

fn stub_exec(_resp: &mut Responder<'_>, _line: &mut LineSettings) -> CmdResult {
    Ok(())
}

pub(crate) static GENERIC_COMMANDS: [AtCommand<LineSettings>; 4] = [
    AtCommand {
        exec: Some(stub_exec),
        read: Some(s3_read),
        ..AtCommand::named("S3")
    },
    AtCommand {
        exec: Some(e0_exec),
        ..AtCommand::named("E0")
    },
    AtCommand {
        exec: Some(e1_exec),
        ..AtCommand::named("E1")
    },
    AtCommand {
        exec: Some(stub_exec),
        ..AtCommand::named("")
    },
];
