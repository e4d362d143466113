//! Modem device state
//!
//! One instance per emulated device. Mutated only by command handlers and
//! the driver's tick/inject calls, which run on the same thread between
//! input chunks.

use log::warn;

/// Capacity of the received-message store.
pub const MSG_SLOTS: usize = 10;

/// A received short message held in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSms {
    /// Delivery state as reported by `+CMGL` (0 = received unread)
    pub state: u8,
    /// Hex-encoded PDU
    pub pdu: String,
}

/// Mutable device state backing the command handlers.
#[derive(Debug)]
pub struct ModemState {
    pub iccid: String,
    pub imsi: String,
    /// Registered network, numeric form
    pub plmn: String,
    pub network_name: String,
    /// Received signal strength, dBm; 0 means unknown
    pub rssi: i32,
    messages: [Option<StoredSms>; MSG_SLOTS],
}

impl ModemState {
    /// Device with the reference identifiers (almost arbitrary values).
    pub fn new() -> Self {
        Self {
            iccid: "8970169934461058920".to_string(),
            imsi: "250692933657186".to_string(),
            plmn: "25069".to_string(),
            network_name: "FunComm".to_string(),
            rssi: -60,
            messages: Default::default(),
        }
    }

    /// Store a received PDU in the first free slot.
    ///
    /// Slot indices are stable: a message keeps its slot until explicitly
    /// deleted and the store is never compacted, since clients rely on the
    /// indices returned by the listing command. A full store drops the PDU.
    pub fn store_sms(&mut self, pdu: String) {
        match self.messages.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => *slot = Some(StoredSms { state: 0, pdu }),
            None => warn!("no free message slot(s), PDU will be dropped"),
        }
    }

    /// Free a message slot. Returns false for an out-of-range index or an
    /// already-empty slot.
    pub fn delete_sms(&mut self, idx: usize) -> bool {
        match self.messages.get_mut(idx) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    pub fn message(&self, idx: usize) -> Option<&StoredSms> {
        self.messages.get(idx).and_then(|slot| slot.as_ref())
    }

    /// Occupied slots in index order.
    pub fn messages(&self) -> impl Iterator<Item = (usize, &StoredSms)> {
        self.messages
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|msg| (i, msg)))
    }

    /// Periodic state advance: drift the RSSI upward and wrap around so the
    /// reported signal quality keeps changing.
    pub fn tick(&mut self) {
        self.rssi += 2;
        if self.rssi > -55 {
            self.rssi = -109;
        }
    }
}

impl Default for ModemState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_first_fit() {
        let mut mdm = ModemState::new();
        mdm.store_sms("AA".to_string());
        mdm.store_sms("BB".to_string());
        assert_eq!(mdm.message(0).unwrap().pdu, "AA");
        assert_eq!(mdm.message(1).unwrap().pdu, "BB");
    }

    #[test]
    fn test_delete_keeps_indices_stable() {
        let mut mdm = ModemState::new();
        mdm.store_sms("AA".to_string());
        mdm.store_sms("BB".to_string());
        mdm.store_sms("CC".to_string());
        assert!(mdm.delete_sms(1));
        // No compaction; next insert reuses the freed slot
        assert_eq!(mdm.message(2).unwrap().pdu, "CC");
        mdm.store_sms("DD".to_string());
        assert_eq!(mdm.message(1).unwrap().pdu, "DD");
    }

    #[test]
    fn test_delete_empty_slot_fails() {
        let mut mdm = ModemState::new();
        assert!(!mdm.delete_sms(0));
        assert!(!mdm.delete_sms(MSG_SLOTS));
    }

    #[test]
    fn test_full_store_drops() {
        let mut mdm = ModemState::new();
        for i in 0..MSG_SLOTS + 2 {
            mdm.store_sms(format!("{:02}", i));
        }
        assert_eq!(mdm.messages().count(), MSG_SLOTS);
        assert_eq!(mdm.message(MSG_SLOTS - 1).unwrap().pdu, "09");
    }

    #[test]
    fn test_tick_wraps_rssi() {
        let mut mdm = ModemState::new();
        mdm.rssi = -56;
        mdm.tick();
        assert_eq!(mdm.rssi, -109);
        mdm.tick();
        assert_eq!(mdm.rssi, -107);
    }
}
