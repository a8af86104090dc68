// Keyhint Input Layer - Device Filtering
// Device matching for autodetection and manual filtering

/// Decide whether a device should be captured.
///
/// 1. With an explicit filter, only devices matching by path or name are used.
/// 2. Otherwise virtual devices are excluded and only keyboards and pointers
///    are captured.
pub fn matches_device_filter(
    device_name: &str,
    device_path: &str,
    filter_names: &[String],
    is_input_source: bool,
    is_virtual: bool,
) -> bool {
    if !filter_names.is_empty() {
        return filter_names
            .iter()
            .any(|name| device_path == name || device_name == name);
    }

    !is_virtual && is_input_source
}
