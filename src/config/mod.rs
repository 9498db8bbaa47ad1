//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.stockwell.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `STOCKWELL_REQUEST_URL`, `STOCKWELL_TOKEN`,
//!    or legacy `ERP_TOKEN`
//! 4. **Command-line arguments** – `--request-url`/`-u` and `--token`/`-t`
//!
//! # Configuration File
//!
//! Place `.stockwell.toml` in the current directory, home directory, or
//! XDG config directory with:
//!
//! ```toml
//! request_url = "https://erp.example.com/forms/mif/42"
//! token = "erp_example"
//! service_url = "https://erp.example.com"
//! user_name = "s.rao"
//! role = "head"
//! required_vendor_fields = ["vendor_name", "approx_price"]
//! ```

use std::env;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::editor::{EditorIdentity, VendorPolicy};
use crate::erp::error::ApprovalError;
use crate::erp::models::{CertificateChoice, VendorDetails};
use crate::export::ExportFormat;

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Load and print a single request by URL.
    SingleRequest,
    /// List requests awaiting the caller's action.
    PendingListing,
    /// Interactive TUI for reviewing and deciding a request.
    ReviewTui,
    /// Export a request's decision record to a file or stdout.
    Export,
    /// Push vendor details onto one component of a request.
    VendorUpdate,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `STOCKWELL_REQUEST_URL` or `--request-url`: Form URL to act on
/// - `STOCKWELL_TOKEN`, `ERP_TOKEN`, or `--token`: Authentication token
/// - `STOCKWELL_SERVICE_URL` or `--service-url`: ERP root for listings
/// - `STOCKWELL_USER_NAME` / `STOCKWELL_ROLE`: Identity stamped onto edits
///
/// # Example
///
/// ```no_run
/// use stockwell::StockwellConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = StockwellConfig::load().expect("failed to load configuration");
/// let request_url = config.require_request_url().expect("request URL required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "STOCKWELL",
    discovery(
        dotfile_name = ".stockwell.toml",
        config_file_name = "stockwell.toml",
        app_name = "stockwell"
    )
)]
pub struct StockwellConfig {
    /// ERP form URL to act on.
    ///
    /// Can be provided via:
    /// - CLI: `--request-url <URL>` or `-u <URL>`
    /// - Environment: `STOCKWELL_REQUEST_URL`
    /// - Config file: `request_url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub request_url: Option<String>,

    /// API token for backend authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `STOCKWELL_TOKEN` or `ERP_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// ERP root URL used for pending-request listings.
    ///
    /// Can be provided via:
    /// - CLI: `--service-url <URL>` or `-s <URL>`
    /// - Environment: `STOCKWELL_SERVICE_URL`
    /// - Config file: `service_url = "..."`
    #[ortho_config(cli_short = 's')]
    pub service_url: Option<String>,

    /// Display name stamped onto change-history entries and draft notes.
    #[ortho_config()]
    pub user_name: Option<String>,

    /// Role the user acts in (e.g. `head`, `inventory`, `purchase`, `ceo`).
    #[ortho_config()]
    pub role: Option<String>,

    /// Enables interactive TUI mode for reviewing a request.
    ///
    /// When set, Stockwell launches a terminal user interface for editing
    /// quantities, remarks, and notes before approving or rejecting.
    ///
    /// Can be provided via:
    /// - CLI: `--tui` / `-T`
    /// - Config file: `tui = true`
    #[ortho_config(cli_short = 'T')]
    pub tui: bool,

    /// Path the decision record is exported to; `-` writes to stdout.
    ///
    /// Setting this selects export mode.
    #[ortho_config()]
    pub export_path: Option<Utf8PathBuf>,

    /// Export format: `markdown` (default) or `jsonl`.
    #[ortho_config()]
    pub export_format: Option<String>,

    /// Vendor fields that must be filled before a purchase approval.
    ///
    /// Recognised names: `vendor_name`, `vendor_link`, `approx_price`,
    /// `expected_delivery`, `certificate`. Which fields are mandatory is a
    /// deployment decision, so it lives here rather than in code.
    #[ortho_config()]
    pub required_vendor_fields: Vec<String>,

    /// Maximum character count for a draft note.
    #[ortho_config()]
    pub note_max_length: usize,

    /// MiniJinja template offered when composing remarks.
    ///
    /// Variables: `component`, `part_number`, `requested`, `updated`, `unit`.
    #[ortho_config()]
    pub remark_template: Option<String>,

    /// Submits approvals with the priority flag set.
    #[ortho_config()]
    pub priority: bool,

    /// Emits telemetry events to stderr as JSON lines.
    #[ortho_config()]
    pub telemetry: bool,

    /// Component a vendor update applies to.
    ///
    /// Setting this (together with a request URL) selects vendor-update
    /// mode; the `vendor_*` fields below supply the record.
    #[ortho_config()]
    pub vendor_component: Option<u64>,

    /// Vendor company name for a vendor update.
    #[ortho_config()]
    pub vendor_name: Option<String>,

    /// Vendor product or quote link for a vendor update.
    #[ortho_config()]
    pub vendor_link: Option<String>,

    /// Approximate unit price, in minor currency units.
    #[ortho_config()]
    pub vendor_price: Option<u64>,

    /// Expected delivery date (ISO 8601 format).
    #[ortho_config()]
    pub vendor_delivery: Option<String>,

    /// Certificate decision: `yes` or `no`; unset leaves it undecided.
    #[ortho_config()]
    pub vendor_certificate: Option<String>,
}

const DEFAULT_NOTE_MAX_LENGTH: usize = 500;

impl Default for StockwellConfig {
    fn default() -> Self {
        Self {
            request_url: None,
            token: None,
            service_url: None,
            user_name: None,
            role: None,
            tui: false,
            export_path: None,
            export_format: None,
            required_vendor_fields: Vec::new(),
            note_max_length: DEFAULT_NOTE_MAX_LENGTH,
            remark_template: None,
            priority: false,
            telemetry: false,
            vendor_component: None,
            vendor_name: None,
            vendor_link: None,
            vendor_price: None,
            vendor_delivery: None,
            vendor_certificate: None,
        }
    }
}

impl StockwellConfig {
    /// Resolves the token from configuration or the legacy `ERP_TOKEN`
    /// environment variable.
    ///
    /// For backward compatibility, if no token is provided via
    /// `STOCKWELL_TOKEN`, the CLI, or a configuration file, this method falls
    /// back to reading `ERP_TOKEN` from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::MissingToken`] when no token source provides
    /// a value.
    pub fn resolve_token(&self) -> Result<String, ApprovalError> {
        self.token
            .clone()
            .or_else(|| env::var("ERP_TOKEN").ok())
            .ok_or(ApprovalError::MissingToken)
    }

    /// Returns the request URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::MissingRequestUrl`] when no URL is
    /// configured.
    pub fn require_request_url(&self) -> Result<&str, ApprovalError> {
        self.request_url
            .as_deref()
            .ok_or(ApprovalError::MissingRequestUrl)
    }

    /// Returns the service URL for listings.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Configuration`] when no service URL is
    /// configured.
    pub fn require_service_url(&self) -> Result<&str, ApprovalError> {
        self.service_url
            .as_deref()
            .ok_or_else(|| ApprovalError::Configuration {
                message: "ERP service URL is required (use --service-url or -s)".to_owned(),
            })
    }

    /// Determines the operation mode based on provided configuration.
    ///
    /// Returns `VendorUpdate` if a vendor component is named with a request
    /// URL, `Export` if an export path is set with a request URL,
    /// `ReviewTui` if TUI mode is enabled with a request URL,
    /// `SingleRequest` if a request URL is provided alone, or
    /// `PendingListing` otherwise.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.vendor_component.is_some() && self.request_url.is_some() {
            OperationMode::VendorUpdate
        } else if self.export_path.is_some() && self.request_url.is_some() {
            OperationMode::Export
        } else if self.tui && self.request_url.is_some() {
            OperationMode::ReviewTui
        } else if self.request_url.is_some() {
            OperationMode::SingleRequest
        } else {
            OperationMode::PendingListing
        }
    }

    /// Identity stamped onto change-history entries and draft notes.
    ///
    /// Missing values fall back to neutral placeholders; the backend records
    /// the authoritative identity from the token either way.
    #[must_use]
    pub fn resolve_identity(&self) -> EditorIdentity {
        EditorIdentity {
            user_name: self
                .user_name
                .clone()
                .unwrap_or_else(|| "unknown".to_owned()),
            role: self.role.clone().unwrap_or_else(|| "approver".to_owned()),
        }
    }

    /// Builds the vendor-field policy from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Configuration`] for unknown field names.
    pub fn vendor_policy(&self) -> Result<VendorPolicy, ApprovalError> {
        VendorPolicy::from_names(self.required_vendor_fields.iter().map(String::as_str))
    }

    /// Parses the configured export format, defaulting to Markdown.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Configuration`] for unknown format names.
    pub fn export_format(&self) -> Result<ExportFormat, ApprovalError> {
        self.export_format
            .as_deref()
            .map_or(Ok(ExportFormat::default()), str::parse)
    }

    /// Maximum draft-note length, floored at one character.
    #[must_use]
    pub fn note_max_length(&self) -> usize {
        self.note_max_length.max(1)
    }

    /// Builds the vendor record for vendor-update mode.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Configuration`] when `vendor_certificate`
    /// carries anything other than `yes` or `no`.
    pub fn vendor_details(&self) -> Result<VendorDetails, ApprovalError> {
        let certificate = match self.vendor_certificate.as_deref() {
            None => CertificateChoice::Unset,
            Some(value) if value.eq_ignore_ascii_case("yes") => CertificateChoice::Yes,
            Some(value) if value.eq_ignore_ascii_case("no") => CertificateChoice::No,
            Some(other) => {
                return Err(ApprovalError::Configuration {
                    message: format!(
                        "vendor_certificate must be `yes` or `no`, got `{other}`"
                    ),
                });
            }
        };
        Ok(VendorDetails {
            vendor_name: self.vendor_name.clone(),
            vendor_link: self.vendor_link.clone(),
            approx_price: self.vendor_price,
            expected_delivery: self.vendor_delivery.clone(),
            certificate,
        })
    }
}
