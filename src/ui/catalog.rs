//! User-facing message catalog.
//!
//! The engine only emits `MessageKey`s; this lookup is the one place
//! that turns them into prose. Swap it out to localize or rebrand
//! without touching any rule.

use crate::models::message_key::MessageKey;

pub fn message(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Early => "Llegaste antes. ¡Ejemplar! 😎",
        MessageKey::OnTime => "Registro ok.",
        MessageKey::Late => "ESTÁS LLEGANDO TARDE. Justificá: _______",
        MessageKey::Oor => "Entrada fuera del rango autorizado.",
        MessageKey::EarlyOut => "Salida anticipada. Motivo: _______",
        MessageKey::OnTimeOut => "Registro ok.",
        MessageKey::Overtime => "Tiempo extra. Detallá tareas: _______",
        MessageKey::OorOut => "Salida fuera del rango autorizado.",
        MessageKey::ClosedDay => "Día no laboral.",
        MessageKey::ClosedWindow => "La ventana de registro está cerrada.",
        MessageKey::ThreeLatesNotice => "3+ tardanzas esta semana. Se notificará a RR.HH.",
        MessageKey::DuplicateRecord => "Ya registraste este marcaje hoy.",
        MessageKey::OrphanCheckout => "Salida sin entrada registrada hoy; quedará en revisión.",
        MessageKey::GeofenceFailed => "Estás fuera del área autorizada para marcar.",
    }
}
