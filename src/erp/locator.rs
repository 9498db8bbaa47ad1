//! URL parsing and identity wrappers for request intake.

use url::Url;

use super::error::ApprovalError;

/// Kind of material form a request belongs to.
///
/// Issue forms draw against on-hand stock; request forms trigger procurement.
/// The kind decides the quantity-clamp policy in the editor and the API paths
/// used by the gateways.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Material Issue Form: issue on-hand stock to a requester.
    Mif,
    /// Material Request Form: procure stock not currently on hand.
    Mrf,
}

impl FormKind {
    /// Parses a lowercase path segment into a form kind.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::UnknownFormKind`] for anything other than
    /// `mif` or `mrf` (case-insensitive).
    pub fn parse(segment: &str) -> Result<Self, ApprovalError> {
        if segment.eq_ignore_ascii_case("mif") {
            Ok(Self::Mif)
        } else if segment.eq_ignore_ascii_case("mrf") {
            Ok(Self::Mrf)
        } else {
            Err(ApprovalError::UnknownFormKind {
                segment: segment.to_owned(),
            })
        }
    }

    /// Path segment used by the API for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mif => "mif",
            Self::Mrf => "mrf",
        }
    }

    /// Human-readable abbreviation for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mif => "MIF",
            Self::Mrf => "MRF",
        }
    }
}

/// Form number wrapper enforcing positivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormNumber(u64);

impl FormNumber {
    pub(crate) const fn new(value: u64) -> Result<Self, ApprovalError> {
        if value == 0 {
            return Err(ApprovalError::InvalidFormNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// API token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::MissingToken`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ApprovalError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ApprovalError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ApiToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Derives the ERP API base URL from a parsed front-end URL.
///
/// The browser-facing ERP serves its JSON API under `/api` on the same host.
fn derive_api_base(parsed: &Url) -> Result<Url, ApprovalError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| ApprovalError::InvalidUrl("URL must include a host".to_owned()))?;

    let authority = if host.contains(':') {
        format!("[{host}]")
    } else {
        host.to_owned()
    };
    let mut api_url = Url::parse(&format!("{scheme}://{authority}", scheme = parsed.scheme()))
        .map_err(|error| ApprovalError::InvalidUrl(error.to_string()))?;

    api_url
        .set_port(parsed.port())
        .map_err(|()| ApprovalError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api");
    Ok(api_url)
}

/// Parsed material-form URL and derived API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocator {
    api_base: Url,
    kind: FormKind,
    number: FormNumber,
}

impl RequestLocator {
    /// Parses an ERP form URL in the form
    /// `https://erp.example.com/forms/<mif|mrf>/<number>`.
    ///
    /// This is the URL an employee copies out of the browser address bar, so
    /// the locator accepts exactly what the web UI produces.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidUrl`] when parsing fails,
    /// [`ApprovalError::MissingPathSegments`] when the path is not
    /// `/forms/<kind>/<number>`, [`ApprovalError::UnknownFormKind`] for an
    /// unrecognised kind segment, and [`ApprovalError::InvalidFormNumber`]
    /// when the final segment is not a positive integer.
    pub fn parse(input: &str) -> Result<Self, ApprovalError> {
        let parsed =
            Url::parse(input).map_err(|error| ApprovalError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed
            .path_segments()
            .ok_or(ApprovalError::MissingPathSegments)?;

        let marker = segments.next().ok_or(ApprovalError::MissingPathSegments)?;
        let kind_segment = segments.next().ok_or(ApprovalError::MissingPathSegments)?;
        let number_segment = segments.next().ok_or(ApprovalError::MissingPathSegments)?;

        if marker != "forms" {
            return Err(ApprovalError::MissingPathSegments);
        }

        if number_segment.is_empty() {
            return Err(ApprovalError::MissingPathSegments);
        }

        let kind = FormKind::parse(kind_segment)?;
        let number = number_segment
            .parse::<u64>()
            .map_err(|_| ApprovalError::InvalidFormNumber)
            .and_then(FormNumber::new)?;

        let api_base = derive_api_base(&parsed)?;

        Ok(Self {
            api_base,
            kind,
            number,
        })
    }

    /// Builds a locator from an already-known API base and form identity.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidUrl`] when `base` does not parse and
    /// [`ApprovalError::InvalidFormNumber`] when `number` is zero.
    pub fn from_parts(base: &str, kind: FormKind, number: u64) -> Result<Self, ApprovalError> {
        let parsed =
            Url::parse(base).map_err(|error| ApprovalError::InvalidUrl(error.to_string()))?;
        let api_base = derive_api_base(&parsed)?;
        let number = FormNumber::new(number)?;
        Ok(Self {
            api_base,
            kind,
            number,
        })
    }

    /// API base URL derived from the request host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Form kind.
    #[must_use]
    pub const fn kind(&self) -> FormKind {
        self.kind
    }

    /// Form number.
    #[must_use]
    pub const fn number(&self) -> FormNumber {
        self.number
    }

    /// Display label such as `MIF #42`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} #{}", self.kind.label(), self.number.get())
    }

    pub(crate) fn details_path(&self) -> String {
        format!("/requests/{}/{}", self.kind.as_str(), self.number.get())
    }

    pub(crate) fn approve_path(&self) -> String {
        format!(
            "/requests/{}/{}/approve",
            self.kind.as_str(),
            self.number.get()
        )
    }

    pub(crate) fn reject_path(&self) -> String {
        format!(
            "/requests/{}/{}/reject",
            self.kind.as_str(),
            self.number.get()
        )
    }

    pub(crate) fn vendor_path(&self, component_id: u64) -> String {
        format!(
            "/requests/{}/{}/components/{component_id}/vendor",
            self.kind.as_str(),
            self.number.get()
        )
    }
}

/// Parsed ERP root URL with derived API base.
///
/// Unlike [`RequestLocator`], this type represents the service without a
/// specific form, suitable for listing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLocator {
    api_base: Url,
}

impl ServiceLocator {
    /// Parses the ERP root URL, e.g. `https://erp.example.com`.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidUrl`] when parsing fails.
    pub fn parse(input: &str) -> Result<Self, ApprovalError> {
        let parsed =
            Url::parse(input).map_err(|error| ApprovalError::InvalidUrl(error.to_string()))?;
        let api_base = derive_api_base(&parsed)?;
        Ok(Self { api_base })
    }

    /// API base URL derived from the service host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Returns the API path for listing pending requests.
    pub(crate) fn pending_path(&self) -> String {
        "/requests/pending".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ApiToken, FormKind, RequestLocator, ServiceLocator};
    use crate::erp::error::ApprovalError;

    #[rstest]
    #[case("https://erp.example.com/forms/mif/42", FormKind::Mif, 42)]
    #[case("https://erp.example.com/forms/MRF/7", FormKind::Mrf, 7)]
    #[case("http://erp.internal:8443/forms/mrf/1", FormKind::Mrf, 1)]
    fn parse_accepts_valid_form_urls(
        #[case] input: &str,
        #[case] kind: FormKind,
        #[case] number: u64,
    ) {
        let locator = RequestLocator::parse(input).expect("URL should parse");
        assert_eq!(locator.kind(), kind);
        assert_eq!(locator.number().get(), number);
        assert_eq!(locator.api_base().path(), "/api");
    }

    #[test]
    fn parse_derives_api_base_with_port() {
        let locator = RequestLocator::parse("http://erp.internal:8443/forms/mif/9")
            .expect("URL should parse");
        assert_eq!(locator.api_base().as_str(), "http://erp.internal:8443/api");
    }

    #[rstest]
    #[case::missing_number("https://erp.example.com/forms/mif")]
    #[case::wrong_marker("https://erp.example.com/form/mif/42")]
    #[case::empty_number("https://erp.example.com/forms/mif/")]
    fn parse_rejects_incomplete_paths(#[case] input: &str) {
        let error = RequestLocator::parse(input).expect_err("URL should be rejected");
        assert_eq!(error, ApprovalError::MissingPathSegments);
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        let error = RequestLocator::parse("https://erp.example.com/forms/grn/42")
            .expect_err("unknown kind should be rejected");
        assert!(
            matches!(error, ApprovalError::UnknownFormKind { segment } if segment == "grn"),
            "unexpected error"
        );
    }

    #[rstest]
    #[case("https://erp.example.com/forms/mif/0")]
    #[case("https://erp.example.com/forms/mif/abc")]
    fn parse_rejects_invalid_numbers(#[case] input: &str) {
        let error = RequestLocator::parse(input).expect_err("number should be rejected");
        assert_eq!(error, ApprovalError::InvalidFormNumber);
    }

    #[test]
    fn paths_include_kind_and_number() {
        let locator =
            RequestLocator::parse("https://erp.example.com/forms/mif/42").expect("should parse");
        assert_eq!(locator.details_path(), "/requests/mif/42");
        assert_eq!(locator.approve_path(), "/requests/mif/42/approve");
        assert_eq!(locator.reject_path(), "/requests/mif/42/reject");
        assert_eq!(locator.vendor_path(7), "/requests/mif/42/components/7/vendor");
        assert_eq!(locator.label(), "MIF #42");
    }

    #[test]
    fn service_locator_derives_api_base() {
        let locator = ServiceLocator::parse("https://erp.example.com").expect("should parse");
        assert_eq!(locator.api_base().as_str(), "https://erp.example.com/api");
        assert_eq!(locator.pending_path(), "/requests/pending");
    }

    #[test]
    fn api_token_rejects_blank_values() {
        let error = ApiToken::new("   ").expect_err("blank token should be rejected");
        assert_eq!(error, ApprovalError::MissingToken);
    }

    #[test]
    fn api_token_trims_whitespace() {
        let token = ApiToken::new("  secret  ").expect("token should be accepted");
        assert_eq!(token.value(), "secret");
    }
}
