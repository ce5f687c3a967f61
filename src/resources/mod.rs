//! The store's resources as the back office sees them.

mod schemas;
mod wire;

pub use schemas::sign_in_schema;
pub use wire::WireFields;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::config::UploadConfig;
use crate::forms::{FormDraft, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Product,
    Category,
    Coupon,
    Pincode,
    Tax,
    DeliveryCharge,
    Gallery,
    GalleryCategory,
    Enquiry,
    User,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::Product,
        Resource::Category,
        Resource::Coupon,
        Resource::Pincode,
        Resource::Tax,
        Resource::DeliveryCharge,
        Resource::Gallery,
        Resource::GalleryCategory,
        Resource::Enquiry,
        Resource::User,
    ];

    /// Path segment under the API base URL, also used for the admin routes.
    pub fn segment(&self) -> &'static str {
        match self {
            Resource::Product => "product",
            Resource::Category => "category",
            Resource::Coupon => "coupon",
            Resource::Pincode => "pincode",
            Resource::Tax => "tax",
            Resource::DeliveryCharge => "delivery-charge",
            Resource::Gallery => "gallery",
            Resource::GalleryCategory => "gallery-category",
            Resource::Enquiry => "enquiry",
            Resource::User => "user",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Resource::Product => "Products",
            Resource::Category => "Categories",
            Resource::Coupon => "Coupons",
            Resource::Pincode => "Pincodes",
            Resource::Tax => "Tax",
            Resource::DeliveryCharge => "Delivery Charge",
            Resource::Gallery => "Gallery",
            Resource::GalleryCategory => "Gallery Categories",
            Resource::Enquiry => "Enquiries",
            Resource::User => "Users",
        }
    }

    /// Singletons are read whole and saved in place rather than paginated.
    pub fn is_settings(&self) -> bool {
        matches!(self, Resource::Tax | Resource::DeliveryCharge)
    }

    /// Top level key the settings read answers under.
    pub fn settings_key(&self) -> Option<&'static str> {
        match self {
            Resource::Tax => Some("tax"),
            Resource::DeliveryCharge => Some("deliveryCharge"),
            _ => None,
        }
    }

    pub fn schema(&self, uploads: &UploadConfig) -> Schema {
        schemas::schema_for(*self, uploads)
    }

    /// The draft laid out the way the store API reads it.
    pub fn wire_fields(&self, draft: &FormDraft) -> WireFields {
        wire::wire_fields(*self, draft)
    }

    /// A listed row reshaped into the form's fields, ready to prefill an edit.
    pub fn edit_record(&self, record: Value) -> Value {
        wire::edit_record(*self, record)
    }

    /// Form field filled from another resource's records, and that resource.
    pub fn choice_source(&self) -> Option<(&'static str, Resource)> {
        match self {
            Resource::Product => Some(("category", Resource::Category)),
            Resource::Gallery => Some(("category", Resource::GalleryCategory)),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown resource: {0}")]
pub struct UnknownResource(pub String);

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.segment() == s)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}

/// Create or update, carrying the record id for updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update(String),
}

/// Where a form submission goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTarget {
    pub resource: Resource,
    pub mode: SubmitMode,
}

impl SubmitTarget {
    pub fn create(resource: Resource) -> Self {
        Self {
            resource,
            mode: SubmitMode::Create,
        }
    }

    pub fn update(resource: Resource, id: impl Into<String>) -> Self {
        Self {
            resource,
            mode: SubmitMode::Update(id.into()),
        }
    }

    pub fn path(&self) -> String {
        let segment = self.resource.segment();
        if self.resource.is_settings() {
            return format!("{}/", segment);
        }
        match &self.mode {
            SubmitMode::Create => format!("{}/create", segment),
            SubmitMode::Update(id) => format!("{}/update/{}", segment, id),
        }
    }

    /// The store API takes updates as POST as well.
    pub fn method(&self) -> Method {
        Method::POST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_round_trip() {
        for resource in Resource::ALL {
            assert_eq!(resource.segment().parse::<Resource>().unwrap(), resource);
        }
        assert!("orders".parse::<Resource>().is_err());
    }

    #[test]
    fn test_submit_paths() {
        assert_eq!(SubmitTarget::create(Resource::Category).path(), "category/create");
        assert_eq!(
            SubmitTarget::update(Resource::Product, "12").path(),
            "product/update/12"
        );
        assert_eq!(
            SubmitTarget::update(Resource::GalleryCategory, "3").path(),
            "gallery-category/update/3"
        );
        assert_eq!(SubmitTarget::create(Resource::Tax).path(), "tax/");
        assert_eq!(SubmitTarget::create(Resource::User).method(), Method::POST);
    }

    #[test]
    fn test_choice_sources() {
        assert_eq!(
            Resource::Product.choice_source(),
            Some(("category", Resource::Category))
        );
        assert_eq!(
            Resource::Gallery.choice_source(),
            Some(("category", Resource::GalleryCategory))
        );
        assert!(Resource::Coupon.choice_source().is_none());
    }

    #[test]
    fn test_settings_resources() {
        assert!(Resource::Tax.is_settings());
        assert_eq!(Resource::DeliveryCharge.settings_key(), Some("deliveryCharge"));
        assert!(!Resource::Coupon.is_settings());
        assert!(Resource::Coupon.settings_key().is_none());
    }
}
