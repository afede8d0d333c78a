pub mod prefix;
pub mod upload_emoji;
