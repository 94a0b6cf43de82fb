pub mod parsed_email;
pub mod recipient_type;

pub use parsed_email::ParsedEmail;
pub use recipient_type::RecipientType;
