//! Concatenated-SMS PDU encoder
//!
//! Builds the three parts of one concatenated test message, close enough to
//! real carrier framing for client software to reassemble:
//!
//! - fixed SMSC address, message-type octet, originating address and
//!   PID/DCS octets
//! - TP-SCTS service-center timestamp in nibble-swapped BCD, local time
//! - a 6-octet user-data header carrying the concatenation element
//!   (8-bit reference shared by all parts, total count, 1-based sequence)
//! - a pre-packed GSM 7-bit text payload per part
//!
//! Reference: 3GPP TS 23.040 §9.2.2.1 (SMS-DELIVER), §9.2.3.24 (UDH).

use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike};

use crate::state::ModemState;

/// SMSC address, TP-MTI/TP-MMS octet, TP-OA, TP-PID and TP-DCS.
const BASE_HEADER: &str = "07819700214365F7\
                           40\
                           0B819710325476F8\
                           0000";

/// Pre-packed 7-bit text, one fragment per message part.
const TEXT_PARTS: [&str; 3] = [
    "986F79B90D4AC3E7F53688FC66BFE5A0799A0E0AB7CB741668FC76CFCB637A99\
     5E9783C2E4343C3D1FA7DD6750999DA6B340F33219447E83CAE9FABCFD2683E8\
     E536FC2D07A5DDE334394DAEBBE9A03A1DC40E8BDFF232A84C0791DFECB7BC0C\
     6A87CFEE3028CC4EC7EB6117A84A0795DDE936284C06B5D3EE741B642FBBD3E1\
     360B14AFA7E7",
    "40EEF79C2EAF9341657C593E4ED3C3F4F4DB0DAAB3D9E1F6F80D6287C56F797A\
     0E72A7E769509D0E0AB3D3F17A1A0E2AE341E53068FC6EB7DFE43768FC76CFCB\
     F17A98EE0211EBE939285CA7974169795D5E0691DFECB71C947683E465B8BC8C\
     2EBBC965799A0E4ABB41F637BB0EA787E96590BDCC4ED341E5F9BC0C1AA7D9EC\
     7A1B447EB3DF",
    "E46550B90E32D7CFE9301DE4AEB3D961103C2C4F87E975B90B54C48FCB707AB9\
     2E07CDD36E3AE83D1E87CBE3301D34AEC3D3E4303D4C07B9DF6E105CFE4E93CB\
     6E3A0B34AFBBE9A0B41B34AEB3E16150BC9E06BDCDE6F4381D0691CBF3B2BCEE\
     A683DA6F363B4D0785DDE936284D0695E774103B2C7ECBEB6D17",
];

/// Build the parts of a concatenated test message from the current local
/// time and a random concatenation reference, and store them.
pub fn inject_test_sms(mdm: &mut ModemState) {
    inject_at(mdm, &Local::now().fixed_offset(), rand::random());
}

pub(crate) fn inject_at(mdm: &mut ModemState, ts: &DateTime<FixedOffset>, reference: u8) {
    let scts = encode_scts(ts);

    for (i, part) in TEXT_PARTS.iter().enumerate() {
        // User-data length in septets; the +12 accounts for the UDH octets
        // and the fill bits that pad the header to a septet boundary
        let udl = (part.len() + 12) / 2 * 8 / 7;
        let udh = format!(
            "{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}",
            5,
            0,
            3,
            reference,
            TEXT_PARTS.len(),
            i + 1
        );
        mdm.store_sms(format!("{}{}{:02X}{}{}", BASE_HEADER, scts, udl, udh, part));
    }
}

/// Encode a TP-SCTS timestamp: 7 nibble-swapped BCD pairs for
/// year/month/day/hour/minute/second plus the UTC offset in quarter-hours,
/// with the high bit of the tens digit set for negative offsets.
fn encode_scts(ts: &DateTime<FixedOffset>) -> String {
    let mut scts = String::with_capacity(14);

    let fields = [
        (ts.year() % 100) as u32,
        ts.month(),
        ts.day(),
        ts.hour(),
        ts.minute(),
        ts.second(),
    ];
    for v in fields {
        scts.push((b'0' + (v % 10) as u8) as char);
        scts.push((b'0' + (v / 10) as u8) as char);
    }

    let offset = ts.offset().local_minus_utc();
    let mut quarters = offset.unsigned_abs() / 60 / 15;
    if offset < 0 {
        quarters += 8 * 10;
    }
    scts.push_str(&format!("{:x}{:x}", quarters % 10, quarters / 10));

    scts
}
