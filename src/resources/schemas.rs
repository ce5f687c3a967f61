// Form schemas for each resource, with the wording the admin screens use.

use super::Resource;
use crate::config::UploadConfig;
use crate::forms::{FieldRule, Schema, ALPHANUMERIC, NUMERIC};

const EMAIL_MESSAGE: &str = "Please enter a valid email (e.g. user@domain.com)";
const PHONE_MESSAGE: &str = "Please enter a valid phone number (e.g. 9876543210)";
const BINARY: [&str; 2] = ["0", "1"];

pub(super) fn schema_for(resource: Resource, uploads: &UploadConfig) -> Schema {
    match resource {
        Resource::Product => product(uploads),
        Resource::Category => category(uploads),
        Resource::Coupon => coupon(),
        Resource::Pincode => pincode(),
        Resource::Tax => tax(),
        Resource::DeliveryCharge => delivery_charge(),
        Resource::Gallery => gallery(uploads),
        Resource::GalleryCategory => gallery_category(),
        Resource::Enquiry => enquiry(),
        Resource::User => user(),
    }
}

pub fn sign_in_schema() -> Schema {
    Schema::new(vec![
        FieldRule::text("email", "Email")
            .email(EMAIL_MESSAGE)
            .required("Email is required"),
        FieldRule::text("password", "Password").required("Password is required"),
    ])
}

fn flag(name: &'static str, label: &'static str) -> FieldRule {
    FieldRule::text(name, label)
        .one_of(&BINARY, format!("{} must be either 0 or 1", label))
        .required(format!("{} is required", label))
        .default_value("1")
}

fn required_text(name: &'static str, label: &'static str) -> FieldRule {
    FieldRule::text(name, label).required(format!("{} is required", label))
}

fn digits(name: &'static str, label: &'static str, invalid: &'static str) -> FieldRule {
    FieldRule::number(name, label)
        .matches(&NUMERIC, invalid)
        .required(format!("{} is required", label))
}

fn slug() -> FieldRule {
    FieldRule::text("slug", "Slug")
        .matches(&ALPHANUMERIC, "Please enter a valid slug (letters and numbers only)")
        .required("Slug is required")
}

fn product(uploads: &UploadConfig) -> Schema {
    Schema::new(vec![
        required_text("name", "Name"),
        slug(),
        required_text("description", "Description"),
        digits("category", "Category", "Please enter a valid category (e.g. 50)"),
        digits("price", "Price", "Please enter a valid price (e.g. 50)"),
        digits("discount", "Discount", "Please enter a valid discount (e.g. 50)"),
        digits("inventory", "Inventory", "Please enter a valid inventory (e.g. 50)"),
        digits("weight", "Weight", "Please enter a valid weight (e.g. 50)"),
        FieldRule::text("unit", "Unit")
            .one_of(&["kg", "g", "pc"], "Unit must be either kg, grams or piece")
            .required("Unit is required")
            .default_value("kg"),
        flag("is_active", "Is active"),
        flag("is_new_arrival", "Is new arrival"),
        flag("is_featured", "Is featured"),
        flag("is_best_sale", "Is best sale"),
        FieldRule::text("image_title", "Image Title"),
        FieldRule::text("image_keywords", "Image Keywords"),
        FieldRule::text("meta_title", "Meta Title"),
        FieldRule::text("meta_keywords", "Meta Keywords"),
        FieldRule::file("featured_image", "Featured Image").image(uploads),
    ])
}

fn category(uploads: &UploadConfig) -> Schema {
    Schema::new(vec![
        required_text("name", "Name"),
        slug(),
        required_text("description", "Description"),
        flag("is_active", "Is active"),
        FieldRule::text("meta_title", "Meta Title"),
        FieldRule::text("meta_keywords", "Meta Keywords"),
        FieldRule::file("banner_image", "Banner Image").image(uploads),
        FieldRule::file("icon_image", "Icon Image").image(uploads),
    ])
}

fn coupon() -> Schema {
    Schema::new(vec![
        digits("discount", "Discount", "Please enter a valid discount (e.g. 50)"),
        FieldRule::number("maximum_dicount_in_price", "Maximum Discount in price").matches(
            &NUMERIC,
            "Please enter a valid maximum discount in price (e.g. 500)",
        ),
        FieldRule::number("maximum_number_of_use", "Maximum number of use per person").matches(
            &NUMERIC,
            "Please enter a valid maximum number of use per person (e.g. 500)",
        ),
        required_text("name", "Coupon Name"),
        FieldRule::text("code", "Coupon Code")
            .matches(
                &ALPHANUMERIC,
                "Please enter a valid coupon code (letters and numbers only)",
            )
            .required("Coupon Code is required"),
        FieldRule::text("description", "Coupon Description"),
        flag("is_active", "Is active"),
    ])
}

fn pincode() -> Schema {
    Schema::new(vec![
        required_text("place", "State"),
        digits("pincode", "Pincode", "Please enter a valid pincode (e.g. 560076)")
            .length(Some(6), Some(6), "Pincode must be 6 digits"),
    ])
}

fn tax() -> Schema {
    Schema::new(vec![FieldRule::number("tax_in_percentage", "Tax")
        .matches(&NUMERIC, "Please enter a valid tax (e.g. 50)")
        .required("Tax is required")])
}

fn delivery_charge() -> Schema {
    Schema::new(vec![
        digits(
            "delivery_charges",
            "Delivery Charges",
            "Please enter a valid delivery charge (e.g. 5)",
        ),
        digits(
            "no_delivery_charges_for_cart_total_price_above",
            "Free delivery threshold",
            "Please enter a valid cart total (e.g. 500)",
        ),
    ])
}

fn gallery(uploads: &UploadConfig) -> Schema {
    Schema::new(vec![
        FieldRule::number("category", "Category")
            .matches(&NUMERIC, "Please enter a valid category number (e.g. 9)"),
        required_text("title", "Title"),
        FieldRule::text("description", "Description"),
        FieldRule::text("image_title", "Image Title"),
        FieldRule::text("image_alt", "Image Alt"),
        FieldRule::file("image", "Image").image(uploads),
    ])
}

fn gallery_category() -> Schema {
    Schema::new(vec![required_text("name", "Category Name")])
}

fn contact_fields() -> Vec<FieldRule> {
    vec![
        digits("phone", "Phone", PHONE_MESSAGE),
        FieldRule::text("email", "Email")
            .email(EMAIL_MESSAGE)
            .required("Email is required"),
        required_text("name", "Name"),
    ]
}

fn enquiry() -> Schema {
    let mut fields = contact_fields();
    fields.extend([
        required_text("company_name", "Company Name"),
        FieldRule::text("company_website", "Company Website")
            .url("Please enter a valid website URL (e.g. https://www.example.com)")
            .required("Company Website is required"),
        required_text("designation", "Designation"),
        required_text("product", "Product"),
        required_text("quantity", "Quantity"),
        required_text("gst", "GST"),
        required_text("certification", "Certification"),
        required_text("address", "Address"),
        FieldRule::text("message", "Message"),
    ]);
    Schema::new(fields)
}

fn user() -> Schema {
    let mut fields = contact_fields();
    fields.extend([
        required_text("password", "Password"),
        FieldRule::text("confirm_password", "Confirm Password")
            .required("Confirm Password is required")
            .same_as("password", "Passwords must match"),
    ]);
    Schema::new(fields)
}
