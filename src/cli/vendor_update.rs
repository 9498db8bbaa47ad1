//! Vendor detail update operation.

use std::io::{self, Write};

use stockwell::erp::FormKind;
use stockwell::{
    ApiToken, ApprovalError, HttpVendorGateway, RequestLocator, StockwellConfig, VendorGateway,
};

use super::output::io_error;

/// Pushes the configured vendor record onto one component.
///
/// The configured vendor-field policy is checked first: any required field
/// still missing blocks the update before the backend is called.
///
/// # Errors
///
/// Returns configuration errors for a missing URL, token, component, or
/// required vendor field, and propagates gateway failures.
pub async fn run(config: &StockwellConfig) -> Result<(), ApprovalError> {
    let request_url = config.require_request_url()?;
    let token = ApiToken::new(config.resolve_token()?)?;
    let component_id = config
        .vendor_component
        .ok_or_else(|| ApprovalError::Configuration {
            message: "vendor component is required (use --vendor-component)".to_owned(),
        })?;

    let locator = RequestLocator::parse(request_url)?;
    if locator.kind() != FormKind::Mrf {
        return Err(ApprovalError::Configuration {
            message: "vendor details apply to MRF lines only".to_owned(),
        });
    }

    let vendor = config.vendor_details()?;
    let policy = config.vendor_policy()?;
    let missing = policy.missing_fields(Some(&vendor));
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|field| field.name()).collect();
        return Err(ApprovalError::Configuration {
            message: format!("required vendor fields missing: {}", names.join(", ")),
        });
    }

    let gateway = HttpVendorGateway::for_token(&token)?;
    gateway.update_vendor(&locator, component_id, &vendor).await?;

    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "Vendor details recorded for component {component_id} on {}",
        locator.label()
    )
    .map_err(|e| io_error(&e))
}
