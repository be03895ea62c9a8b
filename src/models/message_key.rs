use serde::Serialize;

/// Stable classification tags emitted by the engine.
///
/// The engine never hardcodes user-facing prose: callers map these keys
/// through a message catalog (see `ui::catalog`) or their own lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageKey {
    Early,
    OnTime,
    Late,
    Oor,
    EarlyOut,
    OnTimeOut,
    Overtime,
    OorOut,
    ClosedDay,
    ClosedWindow,
    ThreeLatesNotice,
    DuplicateRecord,
    OrphanCheckout,
    GeofenceFailed,
}

impl MessageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::Early => "early",
            MessageKey::OnTime => "on_time",
            MessageKey::Late => "late",
            MessageKey::Oor => "oor",
            MessageKey::EarlyOut => "early_out",
            MessageKey::OnTimeOut => "on_time_out",
            MessageKey::Overtime => "overtime",
            MessageKey::OorOut => "oor_out",
            MessageKey::ClosedDay => "closed_day",
            MessageKey::ClosedWindow => "closed_window",
            MessageKey::ThreeLatesNotice => "three_lates_notice",
            MessageKey::DuplicateRecord => "duplicate_record",
            MessageKey::OrphanCheckout => "orphan_checkout",
            MessageKey::GeofenceFailed => "geofence_failed",
        }
    }
}
