//! 标识（Identity）
//!
//! 不透明的唯一值包装，仅以底层字符串判断相等。生成由 `uuid` 负责，
//! 调用方提供的已有标识通过 `Id::from` 包装，两者包装后不再区分。
//!
use crate::error::DomainResult;
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// 生成新的标识（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// 底层字符串
    pub fn value(&self) -> &str {
        &self.0
    }

    /// 按 UUID 解析底层字符串
    pub fn to_uuid(&self) -> DomainResult<Uuid> {
        Ok(Uuid::parse_str(&self.0)?)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Id {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Uuid> for Id {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
