//! Device command table
//!
//! The commands (and reply quirks) mirror what a Huawei E3372 answers on its
//! AT port, which is what the client software under test expects to see.

use modem_at::{AtCommand, CmdError, CmdResult, Responder};

use crate::state::ModemState;

/// The device command table served ahead of the generic one.
pub fn command_table() -> &'static [AtCommand<ModemState>] {
    &MODEM_COMMANDS
}

static MODEM_COMMANDS: [AtCommand<ModemState>; 10] = [
    AtCommand {
        exec: Some(cimi_exec),
        ..AtCommand::named("+CIMI")
    },
    AtCommand {
        exec: Some(cgmi_exec),
        ..AtCommand::named("+CGMI")
    },
    AtCommand {
        write: Some(cmgd_write),
        ..AtCommand::named("+CMGD")
    },
    AtCommand {
        write: Some(cmgf_write),
        ..AtCommand::named("+CMGF")
    },
    AtCommand {
        write: Some(cmgl_write),
        ..AtCommand::named("+CMGL")
    },
    AtCommand {
        read: Some(cops_read),
        write: Some(cops_write),
        ..AtCommand::named("+COPS")
    },
    AtCommand {
        read: Some(cpin_read),
        ..AtCommand::named("+CPIN")
    },
    AtCommand {
        exec: Some(csq_exec),
        ..AtCommand::named("+CSQ")
    },
    AtCommand {
        read: Some(iccid_read),
        ..AtCommand::named("^ICCID")
    },
    AtCommand {
        exec: Some(sysinfoex_exec),
        ..AtCommand::named("^SYSINFOEX")
    },
];

fn cimi_exec(resp: &mut Responder<'_>, mdm: &mut ModemState) -> CmdResult {
    resp.line(&mdm.imsi)
}

fn cgmi_exec(resp: &mut Responder<'_>, _mdm: &mut ModemState) -> CmdResult {
    resp.line("huawei")
}

/// `+CMGD=<idx>`: delete a stored message.
fn cmgd_write(_resp: &mut Responder<'_>, param: &str, mdm: &mut ModemState) -> CmdResult {
    let idx: usize = param.parse().map_err(|_| CmdError::InvalidParameter)?;
    if mdm.delete_sms(idx) {
        Ok(())
    } else {
        Err(CmdError::InvalidParameter)
    }
}

/// `+CMGF=0`: only PDU mode is supported.
fn cmgf_write(_resp: &mut Responder<'_>, param: &str, _mdm: &mut ModemState) -> CmdResult {
    if param == "0" {
        Ok(())
    } else {
        Err(CmdError::InvalidParameter)
    }
}

/// `+CMGL=4`: list all stored messages; only the "ALL" mode is supported.
fn cmgl_write(resp: &mut Responder<'_>, param: &str, mdm: &mut ModemState) -> CmdResult {
    if param != "4" {
        return Err(CmdError::InvalidParameter);
    }

    for (idx, msg) in mdm.messages() {
        // PDU length in octets is half the hex text length
        resp.linef(format_args!(
            "+CMGL: {},{},,{}",
            idx,
            msg.state,
            msg.pdu.len() / 2
        ))?;
        resp.line(&msg.pdu)?;
    }

    Ok(())
}

fn cops_read(resp: &mut Responder<'_>, mdm: &mut ModemState) -> CmdResult {
    resp.linef(format_args!("+COPS: 0,2,\"{}\",7", mdm.plmn))
}

/// `+COPS=3,2`: only the numeric operator-format configuration is accepted.
fn cops_write(_resp: &mut Responder<'_>, param: &str, _mdm: &mut ModemState) -> CmdResult {
    if param == "3,2" {
        Ok(())
    } else {
        Err(CmdError::InvalidParameter)
    }
}

fn cpin_read(resp: &mut Responder<'_>, _mdm: &mut ModemState) -> CmdResult {
    resp.line("+CPIN: READY")
}

fn csq_exec(resp: &mut Responder<'_>, mdm: &mut ModemState) -> CmdResult {
    resp.linef(format_args!("+CSQ: {},99", csq_level(mdm.rssi)))
}

/// Map a dBm RSSI onto the 0..=31 / 99 scale of `+CSQ`.
fn csq_level(rssi: i32) -> u32 {
    if rssi == 0 {
        99 // Unknown
    } else if rssi >= -57 {
        28
    } else if rssi <= -107 {
        3
    } else {
        ((rssi + 113) / 2) as u32
    }
}

/// `^ICCID?`: the value field is padded with `F` to a 28-character line.
fn iccid_read(resp: &mut Responder<'_>, mdm: &mut ModemState) -> CmdResult {
    let mut line = format!("^ICCID: {}", mdm.iccid);
    while line.len() < 28 {
        line.push('F');
    }
    resp.line(&line)
}

fn sysinfoex_exec(resp: &mut Responder<'_>, _mdm: &mut ModemState) -> CmdResult {
    // Service, PS+CS, non-roaming, SIM valid, no SIM lock indication,
    // sysmode LTE, submode LTE
    resp.line("^SYSINFOEX:2,3,0,1,,6,\"LTE\",101,\"LTE\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csq_level_mapping() {
        assert_eq!(csq_level(0), 99);
        assert_eq!(csq_level(-57), 28);
        assert_eq!(csq_level(-40), 28);
        assert_eq!(csq_level(-107), 3);
        assert_eq!(csq_level(-110), 3);
        assert_eq!(csq_level(-60), 26);
        assert_eq!(csq_level(-105), 4);
    }
}
