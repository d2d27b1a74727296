pub mod inline_asset;

pub use inline_asset::{InlineAsset, InlineAssetError};
