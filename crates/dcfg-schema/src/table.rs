//! The per-version field layout table.
//!
//! This is reference data transcribed from the firmware's settings
//! structure, not an algorithm: offsets, widths, defaults, and command
//! names must match the firmware for every version era. Three layout eras
//! cover the supported span; their code ranges are adjacent so the
//! registry's contiguity invariant holds for every evolving field.
//!
//! Era boundaries:
//! - era A: 8.2.0.0  – 9.3.255.255   (pre display rework)
//! - era B: 9.4.0.0  – 10.1.255.255  (display block, device name, moved topic)
//! - era C: 10.2.0.0 – 12.1.1.255    (widened credentials, 16-slot GPIO map)

use dcfg_model::Group;

use crate::descriptor::{DefaultValue, FieldDescriptor, FieldKind, VersionRange};

/// Lowest supported firmware version (8.2.0.0).
pub const SUPPORTED_MIN: u32 = 0x0802_0000;

/// Highest supported firmware version (12.1.1.255).
pub const SUPPORTED_MAX: u32 = 0x0C01_01FF;

/// The full supported version span.
pub const SUPPORTED: VersionRange = VersionRange::from_codes(SUPPORTED_MIN, SUPPORTED_MAX);

const ERA_A: VersionRange = VersionRange::from_codes(SUPPORTED_MIN, 0x0903_FFFF);
const ERA_B: VersionRange = VersionRange::from_codes(0x0904_0000, 0x0A01_FFFF);
const ERA_C: VersionRange = VersionRange::from_codes(0x0A02_0000, SUPPORTED_MAX);
const ERA_AB: VersionRange = VersionRange::from_codes(SUPPORTED_MIN, 0x0A01_FFFF);
const ERA_BC: VersionRange = VersionRange::from_codes(0x0904_0000, SUPPORTED_MAX);

/// The layout eras in ascending order, each with a short description of
/// what changed at its lower boundary.
pub const ERAS: &[(VersionRange, &str)] = &[
    (ERA_A, "baseline layout"),
    (ERA_B, "display block, device name, relocated MQTT topic"),
    (ERA_C, "widened credentials, 16-slot GPIO map"),
];

const fn uint(width: usize) -> FieldKind {
    FieldKind::Uint { width }
}

const fn int(width: usize) -> FieldKind {
    FieldKind::Int { width }
}

const fn scaled(width: usize, decimals: u8) -> FieldKind {
    FieldKind::Scaled { width, decimals }
}

const fn text(len: usize) -> FieldKind {
    FieldKind::Text { len }
}

const fn bit(bit: u8) -> FieldKind {
    FieldKind::Bits { bit, count: 1 }
}

const fn bits(bit: u8, count: u8) -> FieldKind {
    FieldKind::Bits { bit, count }
}

/// Build the ordered descriptor table.
///
/// Order here is document order: models decoded against any version list
/// their fields in this sequence.
pub fn descriptors() -> Vec<FieldDescriptor> {
    use Group as G;
    let f = FieldDescriptor::new;

    vec![
        // -- System ----------------------------------------------------
        f("save_data", G::System, 0x010, uint(1), SUPPORTED)
            .default(DefaultValue::Int(1))
            .command("SaveData"),
        f("sleep", G::System, 0x011, uint(1), SUPPORTED)
            .default(DefaultValue::Int(50))
            .command("Sleep"),
        f("module", G::System, 0x840, uint(1), SUPPORTED).command("Module"),
        // Introduced with era B; earlier backups fall back to the default.
        f("device_name", G::System, 0x410, text(33), ERA_BC)
            .default(DefaultValue::Text("Tasmota"))
            .command("DeviceName"),
        // -- Management ------------------------------------------------
        f("baudrate", G::Management, 0x012, uint(2), SUPPORTED)
            .default(DefaultValue::Int(1152))
            .command("Baudrate"),
        f("tele_period", G::Management, 0x014, uint(2), SUPPORTED)
            .default(DefaultValue::Int(300))
            .command("TelePeriod"),
        f("timezone", G::Management, 0x440, int(1), SUPPORTED)
            .default(DefaultValue::Int(99))
            .command("Timezone"),
        f("ntp_server", G::Management, 0x2A0, text(33), SUPPORTED)
            .array(3)
            .command("NtpServer"),
        f("ota_url", G::Management, 0x310, text(101), SUPPORTED)
            .default(DefaultValue::Text(
                "http://ota.tasmota.com/tasmota/release/tasmota.bin",
            ))
            .command("OtaUrl"),
        f("friendlyname", G::Management, 0x380, text(33), SUPPORTED)
            .array(4)
            .default(DefaultValue::Text("Tasmota"))
            .command("FriendlyName"),
        f("webserver", G::Management, 0x470, uint(1), SUPPORTED)
            .default(DefaultValue::Int(2))
            .command("WebServer"),
        f("weblog_level", G::Management, 0x471, uint(1), SUPPORTED)
            .default(DefaultValue::Int(2))
            .command("WebLog"),
        // Widened from 33 to 65 bytes in era C.
        f("web_password", G::Management, 0x154, text(33), ERA_AB)
            .sensitive()
            .command("WebPassword"),
        f("web_password", G::Management, 0x154, text(65), ERA_C)
            .sensitive()
            .command("WebPassword"),
        // -- Wifi ------------------------------------------------------
        f("sta_ssid", G::Wifi, 0x040, text(33), SUPPORTED)
            .array(2)
            .command("SSId"),
        f("sta_pwd", G::Wifi, 0x0A0, text(65), SUPPORTED)
            .array(2)
            .sensitive()
            .command("Password"),
        f("hostname", G::Wifi, 0x130, text(33), SUPPORTED)
            .default(DefaultValue::Text("%s-%04d"))
            .command("Hostname"),
        // -- Mqtt ------------------------------------------------------
        f("mqtt_host", G::Mqtt, 0x1A0, text(33), SUPPORTED).command("MqttHost"),
        f("mqtt_port", G::Mqtt, 0x016, uint(2), SUPPORTED)
            .default(DefaultValue::Int(1883))
            .command("MqttPort"),
        f("mqtt_user", G::Mqtt, 0x1C4, text(33), SUPPORTED)
            .default(DefaultValue::Text("DVES_USER"))
            .command("MqttUser"),
        f("mqtt_pwd", G::Mqtt, 0x1E8, text(33), SUPPORTED)
            .sensitive()
            .default(DefaultValue::Text("DVES_PASS"))
            .command("MqttPassword"),
        // Relocated behind the device name block in era B.
        f("mqtt_topic", G::Mqtt, 0x20C, text(33), ERA_A)
            .default(DefaultValue::Text("tasmota"))
            .command("Topic"),
        f("mqtt_topic", G::Mqtt, 0x240, text(33), ERA_BC)
            .default(DefaultValue::Text("tasmota"))
            .command("Topic"),
        f("mqtt_grptopic", G::Mqtt, 0x270, text(33), SUPPORTED)
            .default(DefaultValue::Text("tasmotas"))
            .command("GroupTopic"),
        f("mqtt_retry", G::Mqtt, 0x472, uint(2), SUPPORTED)
            .default(DefaultValue::Int(10))
            .command("MqttRetry"),
        // -- Power -----------------------------------------------------
        f("power_onstate", G::Power, 0x028, uint(1), SUPPORTED)
            .default(DefaultValue::Int(3))
            .command("PowerOnState"),
        f("pulse_timer", G::Power, 0x444, uint(2), SUPPORTED)
            .array(8)
            .command("PulseTime"),
        f("switchmode", G::Power, 0x460, uint(1), SUPPORTED)
            .array(8)
            .command("SwitchMode"),
        f("power", G::Power, 0x844, uint(4), SUPPORTED),
        f("energy_power_calibration", G::Power, 0x030, uint(4), SUPPORTED)
            .default(DefaultValue::Int(12530))
            .command("PowerCal"),
        f(
            "energy_voltage_calibration",
            G::Power,
            0x034,
            uint(4),
            SUPPORTED,
        )
        .default(DefaultValue::Int(1950))
        .command("VoltageCal"),
        f(
            "energy_current_calibration",
            G::Power,
            0x038,
            uint(4),
            SUPPORTED,
        )
        .default(DefaultValue::Int(3500))
        .command("CurrentCal"),
        // -- Light -----------------------------------------------------
        f("ledstate", G::Light, 0x029, uint(1), SUPPORTED)
            .default(DefaultValue::Int(1))
            .command("LedState"),
        // Widened to 16 bits in era C for the slow-fade range.
        f("light_speed", G::Light, 0x02A, uint(1), ERA_AB)
            .default(DefaultValue::Int(1))
            .command("Speed"),
        f("light_speed", G::Light, 0x02A, uint(2), ERA_C)
            .default(DefaultValue::Int(1))
            .command("Speed"),
        f("light_dimmer", G::Light, 0x02C, uint(1), SUPPORTED)
            .default(DefaultValue::Int(10))
            .command("Dimmer"),
        f("light_fade", G::Light, 0x02D, uint(1), SUPPORTED).command("Fade"),
        // -- Display (era B onward) ------------------------------------
        f("display_model", G::Display, 0x03C, uint(1), ERA_BC).command("DisplayModel"),
        f("display_mode", G::Display, 0x03D, uint(1), ERA_BC)
            .default(DefaultValue::Int(1))
            .command("DisplayMode"),
        f("display_refresh", G::Display, 0x03E, uint(1), ERA_BC)
            .default(DefaultValue::Int(2))
            .command("DisplayRefresh"),
        f("display_size", G::Display, 0x7E0, uint(1), ERA_BC)
            .default(DefaultValue::Int(1))
            .command("DisplaySize"),
        // -- Sensor ----------------------------------------------------
        f("altitude", G::Sensor, 0x018, int(2), SUPPORTED).command("Altitude"),
        f("latitude", G::Sensor, 0x01C, scaled(4, 6), SUPPORTED).command("Latitude"),
        f("longitude", G::Sensor, 0x020, scaled(4, 6), SUPPORTED).command("Longitude"),
        f("temp_offset", G::Sensor, 0x860, scaled(2, 1), SUPPORTED).command("TempOffset"),
        f("humidity_offset", G::Sensor, 0x862, scaled(2, 1), SUPPORTED).command("HumOffset"),
        f("temperature_resolution", G::Sensor, 0x024, bits(8, 2), SUPPORTED)
            .default(DefaultValue::Int(1))
            .command("TempRes"),
        // Retired after era A; dropped with a warning on migration.
        f("ex_adc_param", G::Sensor, 0x03C, uint(4), ERA_A),
        // -- Rules -----------------------------------------------------
        f("rule1_enabled", G::Rules, 0x480, bit(0), SUPPORTED).indexed_command("Rule", 1),
        f("rule2_enabled", G::Rules, 0x480, bit(1), SUPPORTED).indexed_command("Rule", 2),
        f("rule3_enabled", G::Rules, 0x480, bit(2), SUPPORTED).indexed_command("Rule", 3),
        f("rules", G::Rules, 0x490, text(256), SUPPORTED).array(3),
        // -- SetOption -------------------------------------------------
        f("so_save_state", G::SetOption, 0x024, bit(0), SUPPORTED)
            .default(DefaultValue::Flag(true))
            .indexed_command("SetOption", 0),
        f("so_button_restrict", G::SetOption, 0x024, bit(1), SUPPORTED)
            .indexed_command("SetOption", 1),
        f("so_mqtt_enabled", G::SetOption, 0x024, bit(3), SUPPORTED)
            .default(DefaultValue::Flag(true))
            .indexed_command("SetOption", 3),
        // -- Timer -----------------------------------------------------
        f("timer", G::Timer, 0x7A0, uint(4), SUPPORTED)
            .array(16)
            .command("Timer"),
        // -- GPIO template (System) ------------------------------------
        // Era A: 13 single-byte slots; era B widened each slot to 16 bits
        // and grew the map to 16 slots.
        f("my_gpio", G::System, 0x7F0, uint(1), ERA_A).array(13),
        f("my_gpio", G::System, 0x800, uint(2), ERA_BC).array(16),
    ]
}
