use bevy::asset::{io::Reader, ron, AssetLoader, LoadContext};
use std::future::Future;
use thiserror::Error;

use super::schema::ItemList;

/// `.ron` 物品表加载器
#[derive(Default)]
pub struct RonItemLoader;

#[derive(Debug, Error)]
pub enum RonItemLoaderError {
    #[error("Could not load item table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse item table: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Item table is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// 解析整张物品表
pub fn parse_item_list(bytes: &[u8]) -> Result<ItemList, RonItemLoaderError> {
    let s = std::str::from_utf8(bytes)?;
    Ok(ron::de::from_str(s)?)
}

impl AssetLoader for RonItemLoader {
    type Asset = ItemList;
    type Settings = ();
    type Error = RonItemLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext,
    ) -> impl Future<Output = Result<Self::Asset, Self::Error>> + Send {
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            parse_item_list(&bytes)
        }
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_utf8() {
        assert!(matches!(
            parse_item_list(&[0xff, 0xfe, 0x00]),
            Err(RonItemLoaderError::Utf8(_))
        ));
    }

    #[test]
    fn rejects_unknown_category() {
        let src = br#"(items: [(id: "x", name: "X", category: Armor)])"#;
        assert!(matches!(parse_item_list(src), Err(RonItemLoaderError::Ron(_))));
    }
}
