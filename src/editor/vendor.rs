//! Vendor field policy for procurement lines.
//!
//! Which vendor fields are mandatory before a purchase approval differs
//! between deployments, so the policy is configuration input rather than a
//! role table baked into the client.

use std::collections::BTreeSet;

use crate::erp::error::ApprovalError;
use crate::erp::models::{CertificateChoice, VendorDetails};

/// One field of the vendor sub-record that a policy can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VendorField {
    /// Vendor company name.
    VendorName,
    /// Product or quote link.
    VendorLink,
    /// Approximate price.
    ApproxPrice,
    /// Expected delivery date.
    ExpectedDelivery,
    /// Certificate decision (must not be left unset).
    Certificate,
}

impl VendorField {
    /// Parses a configuration name into a field.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Configuration`] for unknown names.
    pub fn parse(name: &str) -> Result<Self, ApprovalError> {
        match name.trim() {
            "vendor_name" => Ok(Self::VendorName),
            "vendor_link" => Ok(Self::VendorLink),
            "approx_price" => Ok(Self::ApproxPrice),
            "expected_delivery" => Ok(Self::ExpectedDelivery),
            "certificate" => Ok(Self::Certificate),
            other => Err(ApprovalError::Configuration {
                message: format!("unknown vendor field `{other}` in required_vendor_fields"),
            }),
        }
    }

    /// Configuration name of the field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::VendorName => "vendor_name",
            Self::VendorLink => "vendor_link",
            Self::ApproxPrice => "approx_price",
            Self::ExpectedDelivery => "expected_delivery",
            Self::Certificate => "certificate",
        }
    }
}

/// The set of vendor fields the deployment requires before submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorPolicy {
    required: BTreeSet<VendorField>,
}

impl VendorPolicy {
    /// Builds a policy from configuration names.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Configuration`] for any unknown name.
    pub fn from_names<'a>(
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ApprovalError> {
        let mut required = BTreeSet::new();
        for name in names {
            required.insert(VendorField::parse(name)?);
        }
        Ok(Self { required })
    }

    /// Whether the policy requires nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    /// Returns the required fields missing from the given vendor record.
    ///
    /// An absent record counts every required field as missing.
    #[must_use]
    pub fn missing_fields(&self, vendor: Option<&VendorDetails>) -> Vec<VendorField> {
        self.required
            .iter()
            .copied()
            .filter(|field| !field_present(vendor, *field))
            .collect()
    }
}

fn field_present(vendor: Option<&VendorDetails>, field: VendorField) -> bool {
    let Some(vendor) = vendor else {
        return false;
    };
    match field {
        VendorField::VendorName => non_blank(vendor.vendor_name.as_deref()),
        VendorField::VendorLink => non_blank(vendor.vendor_link.as_deref()),
        VendorField::ApproxPrice => vendor.approx_price.is_some(),
        VendorField::ExpectedDelivery => non_blank(vendor.expected_delivery.as_deref()),
        VendorField::Certificate => vendor.certificate != CertificateChoice::Unset,
    }
}

fn non_blank(value: Option<&str>) -> bool {
    value.is_some_and(|text| !text.trim().is_empty())
}
