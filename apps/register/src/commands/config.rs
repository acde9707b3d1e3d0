//! # Config Commands

use tracing::debug;

use crate::state::ConfigState;

/// Gets the register configuration.
///
/// ## When Used
/// - Startup (store name, currency symbol)
/// - Receipt rendering
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_serializes_camel_case() {
        let json = serde_json::to_value(get_config(&ConfigState::default())).unwrap();
        assert_eq!(json["currencySymbol"], "₱");
        assert_eq!(json["vatEnabled"], true);
        assert_eq!(json["vatRate"], 1200);
    }
}
