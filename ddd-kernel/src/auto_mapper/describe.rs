use super::Plain;
use crate::id::Id;
use chrono::{DateTime, Utc};
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

/// 属性袋：有序的 (键, 形态) 列表
pub type Bag<'a> = Vec<(Cow<'a, str>, Shape<'a>)>;

/// 领域值对 AutoMapper 的自我描述
///
/// 封闭的形态集合，映射器只依据形态分派，不对具体类型做反射。
#[derive(Debug, Clone)]
pub enum Shape<'a> {
    /// 原始值（已是纯数据）
    Value(Plain),
    /// 日期，终结值
    Date(DateTime<Utc>),
    /// 标识，扁平化为底层字符串
    Id(&'a Id),
    /// 有序序列
    Sequence(Vec<Shape<'a>>),
    /// 普通嵌套结构，始终输出映射
    Record(Bag<'a>),
    /// 值对象属性袋，单键时折叠为标量
    ValueObject(Bag<'a>),
    /// 实体/聚合属性袋（含 id 与时间戳），从不折叠
    Entity(Bag<'a>),
}

/// 能描述自身形态的值
pub trait Describe {
    fn describe(&self) -> Shape<'_>;
}

macro_rules! describe_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl Describe for $t {
                fn describe(&self) -> Shape<'_> {
                    Shape::Value(Plain::Number(Number::from(*self)))
                }
            }
        )*
    };
}

describe_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Describe for f32 {
    fn describe(&self) -> Shape<'_> {
        Shape::Value(Plain::from(f64::from(*self)))
    }
}

impl Describe for f64 {
    fn describe(&self) -> Shape<'_> {
        Shape::Value(Plain::from(*self))
    }
}

impl Describe for bool {
    fn describe(&self) -> Shape<'_> {
        Shape::Value(Plain::Bool(*self))
    }
}

impl Describe for char {
    fn describe(&self) -> Shape<'_> {
        Shape::Value(Plain::String(self.to_string()))
    }
}

impl Describe for str {
    fn describe(&self) -> Shape<'_> {
        Shape::Value(Plain::String(self.to_string()))
    }
}

impl Describe for String {
    fn describe(&self) -> Shape<'_> {
        self.as_str().describe()
    }
}

impl Describe for Uuid {
    fn describe(&self) -> Shape<'_> {
        Shape::Value(Plain::String(self.to_string()))
    }
}

impl Describe for Value {
    fn describe(&self) -> Shape<'_> {
        Shape::Value(Plain::from(self.clone()))
    }
}

impl Describe for DateTime<Utc> {
    fn describe(&self) -> Shape<'_> {
        Shape::Date(*self)
    }
}

impl Describe for Id {
    fn describe(&self) -> Shape<'_> {
        Shape::Id(self)
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe(&self) -> Shape<'_> {
        match self {
            Some(value) => value.describe(),
            None => Shape::Value(Plain::Null),
        }
    }
}

impl<T: Describe> Describe for [T] {
    fn describe(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(Describe::describe).collect())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe(&self) -> Shape<'_> {
        self.as_slice().describe()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe(&self) -> Shape<'_> {
        self.as_slice().describe()
    }
}

impl<T: Describe> Describe for BTreeMap<String, T> {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            self.iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v.describe()))
                .collect(),
        )
    }
}

impl<T: Describe, S> Describe for HashMap<String, T, S> {
    fn describe(&self) -> Shape<'_> {
        Shape::Record(
            self.iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v.describe()))
                .collect(),
        )
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe(&self) -> Shape<'_> {
        (**self).describe()
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn describe(&self) -> Shape<'_> {
        (**self).describe()
    }
}

impl<T: Describe + ?Sized> Describe for Arc<T> {
    fn describe(&self) -> Shape<'_> {
        (**self).describe()
    }
}
