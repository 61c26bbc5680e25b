pub mod message;
pub mod patch_type;
pub mod response;
pub mod version;

pub use message::StateMessage;
pub use patch_type::PatchType;
pub use response::ResponseHead;
pub use version::Version;
