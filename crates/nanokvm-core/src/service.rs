// ── Service surface ──
//
// The host-facing table: service name + JSON parameters in, validated
// `ActionRequest` out. Deliberately decoupled from any host framework;
// the CLI uses it, and so could any other embedding.

use serde::Deserialize;
use serde_json::Value;

use crate::action::{ActionRequest, ButtonType, DEFAULT_BUTTON_DURATION_MS};
use crate::error::CoreError;
use crate::wol::MacAddress;

type Constructor = fn(Value) -> Result<ActionRequest, CoreError>;

/// One entry in the service table.
pub struct ServiceDef {
    pub name: &'static str,
    build: Constructor,
}

/// Every service the host surface exposes.
pub const SERVICES: &[ServiceDef] = &[
    ServiceDef { name: "push_button", build: push_button },
    ServiceDef { name: "paste_text", build: paste_text },
    ServiceDef { name: "reboot", build: |p| no_params(p, ActionRequest::Reboot) },
    ServiceDef { name: "reset_hdmi", build: |p| no_params(p, ActionRequest::ResetHdmi) },
    ServiceDef { name: "reset_hid", build: |p| no_params(p, ActionRequest::ResetHid) },
    ServiceDef { name: "wake_on_lan", build: wake_on_lan },
];

/// Build a validated request for `service` from raw JSON parameters.
///
/// Unknown services, unknown fields, and out-of-range values are all
/// rejected here -- nothing invalid gets past this function.
pub fn build_action(service: &str, params: Value) -> Result<ActionRequest, CoreError> {
    let def = SERVICES.iter().find(|s| s.name == service).ok_or_else(|| {
        CoreError::validation("service", format!("unknown service \"{service}\""))
    })?;

    // Callers without parameters may pass null; treat it as empty.
    let params = if params.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        params
    };

    let request = (def.build)(params)?;
    request.validate()?;
    Ok(request)
}

// ── Per-service parameter schemas ───────────────────────────────────

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PushButtonParams {
    button_type: String,
    #[serde(default = "default_duration")]
    duration: u64,
}

fn default_duration() -> u64 {
    DEFAULT_BUTTON_DURATION_MS
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PasteTextParams {
    text: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WakeOnLanParams {
    mac: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoParams {}

// ── Constructors ────────────────────────────────────────────────────

fn push_button(params: Value) -> Result<ActionRequest, CoreError> {
    let p: PushButtonParams = parse(params)?;
    Ok(ActionRequest::PushButton {
        button: p.button_type.parse::<ButtonType>()?,
        duration_ms: p.duration,
    })
}

fn paste_text(params: Value) -> Result<ActionRequest, CoreError> {
    let p: PasteTextParams = parse(params)?;
    Ok(ActionRequest::PasteText { text: p.text })
}

fn wake_on_lan(params: Value) -> Result<ActionRequest, CoreError> {
    let p: WakeOnLanParams = parse(params)?;
    Ok(ActionRequest::WakeOnLan {
        mac: p.mac.parse::<MacAddress>()?,
    })
}

fn no_params(params: Value, request: ActionRequest) -> Result<ActionRequest, CoreError> {
    let _: NoParams = parse(params)?;
    Ok(request)
}

fn parse<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, CoreError> {
    serde_json::from_value(params).map_err(|e| CoreError::validation("params", e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn push_button_applies_default_duration() {
        let request = build_action("push_button", json!({ "button_type": "power" })).unwrap();
        assert_eq!(
            request,
            ActionRequest::PushButton {
                button: ButtonType::Power,
                duration_ms: 100,
            }
        );
    }

    #[test]
    fn push_button_rejects_unknown_button() {
        let err = build_action("push_button", json!({ "button_type": "banana" })).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn push_button_rejects_out_of_range_duration() {
        let err = build_action(
            "push_button",
            json!({ "button_type": "reset", "duration": 10_000 }),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn wake_on_lan_parses_the_mac() {
        let request =
            build_action("wake_on_lan", json!({ "mac": "00:11:22:33:44:55" })).unwrap();
        match request {
            ActionRequest::WakeOnLan { mac } => {
                assert_eq!(mac.octets(), [0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
            }
            other => panic!("expected WakeOnLan, got {other:?}"),
        }
    }

    #[test]
    fn wake_on_lan_rejects_malformed_mac() {
        let err = build_action("wake_on_lan", json!({ "mac": "bad-mac" })).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn parameterless_services_accept_null_and_empty() {
        assert_eq!(
            build_action("reboot", Value::Null).unwrap(),
            ActionRequest::Reboot
        );
        assert_eq!(
            build_action("reset_hid", json!({})).unwrap(),
            ActionRequest::ResetHid
        );
    }

    #[test]
    fn unknown_service_and_stray_fields_are_rejected() {
        assert!(build_action("explode", json!({})).is_err());
        assert!(build_action("reboot", json!({ "force": true })).is_err());
    }
}
