use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use indexmap::IndexMap;
use std::ops::Index;

/// 扁平化后的纯数据
///
/// AutoMapper 的唯一输出格式：原始值、日期、嵌套映射或其数组，标识渲染为字符串。
/// 映射保持属性的声明顺序（相等比较与顺序无关）。
/// 日期保持为终结值，序列化时输出 RFC 3339（毫秒精度，`Z` 结尾）。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Plain {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    List(Vec<Plain>),
    Map(IndexMap<String, Plain>),
}

static NULL: Plain = Plain::Null;

impl Plain {
    /// 映射取值；非映射或不存在时返回 `None`
    pub fn get(&self, key: &str) -> Option<&Plain> {
        match self {
            Plain::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Plain::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Plain::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Plain::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Plain::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Plain::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Plain::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Plain]> {
        match self {
            Plain::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Plain>> {
        match self {
            Plain::Map(map) => Some(map),
            _ => None,
        }
    }

    /// 转换为 JSON，日期渲染为字符串
    pub fn to_json(&self) -> Value {
        match self {
            Plain::Null => Value::Null,
            Plain::Bool(b) => Value::Bool(*b),
            Plain::Number(n) => Value::Number(n.clone()),
            Plain::String(s) => Value::String(s.clone()),
            Plain::Date(d) => Value::String(render_date(d)),
            Plain::List(items) => Value::Array(items.iter().map(Plain::to_json).collect()),
            Plain::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn render_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Index<&str> for Plain {
    type Output = Plain;

    fn index(&self, key: &str) -> &Plain {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Serialize for Plain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Plain::Null => serializer.serialize_unit(),
            Plain::Bool(b) => serializer.serialize_bool(*b),
            Plain::Number(n) => n.serialize(serializer),
            Plain::String(s) => serializer.serialize_str(s),
            Plain::Date(d) => serializer.serialize_str(&render_date(d)),
            Plain::List(items) => serializer.collect_seq(items),
            Plain::Map(map) => serializer.collect_map(map),
        }
    }
}

impl From<Value> for Plain {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Plain::Null,
            Value::Bool(b) => Plain::Bool(b),
            Value::Number(n) => Plain::Number(n),
            Value::String(s) => Plain::String(s),
            Value::Array(items) => Plain::List(items.into_iter().map(Plain::from).collect()),
            Value::Object(map) => {
                Plain::Map(map.into_iter().map(|(k, v)| (k, Plain::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Plain {
    fn from(value: bool) -> Self {
        Plain::Bool(value)
    }
}

impl From<&str> for Plain {
    fn from(value: &str) -> Self {
        Plain::String(value.to_string())
    }
}

impl From<String> for Plain {
    fn from(value: String) -> Self {
        Plain::String(value)
    }
}

impl From<i64> for Plain {
    fn from(value: i64) -> Self {
        Plain::Number(value.into())
    }
}

impl From<f64> for Plain {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Plain::Null, Plain::Number)
    }
}

impl From<DateTime<Utc>> for Plain {
    fn from(value: DateTime<Utc>) -> Self {
        Plain::Date(value)
    }
}

impl From<Vec<Plain>> for Plain {
    fn from(value: Vec<Plain>) -> Self {
        Plain::List(value)
    }
}
