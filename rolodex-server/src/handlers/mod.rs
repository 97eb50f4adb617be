pub mod contacts;
pub mod health;
pub mod photos;

pub use contacts::{
    create_contact_handler, delete_contact_handler, get_contact_handler,
    list_contacts_handler,
};
pub use health::health_handler;
pub use photos::{get_photo_handler, upload_photo_handler};
