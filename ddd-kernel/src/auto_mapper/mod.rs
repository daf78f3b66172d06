//! 自动映射（AutoMapper）
//!
//! 将任意值对象/实体/聚合对象图转换为与领域类型无关的纯数据（`Plain`）：
//! - 标识输出为底层字符串，日期保持不变；
//! - 序列逐元素映射，保持顺序与长度；
//! - 值对象递归扁平化，仅一个属性时折叠为该属性的值；
//! - 实体/聚合始终输出完整映射（`id`、全部属性、`created_at`/`updated_at`）。
//!
//! 映射器是无状态的，只依赖各领域值的 `Describe` 自我描述。
//!
mod describe;
mod plain;

pub use describe::{Bag, Describe, Shape};
pub use plain::Plain;

use crate::aggregate::Aggregate;
use crate::entity::Entity;
use crate::props::Props;
use crate::value_object::ValueObject;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoMapper;

impl AutoMapper {
    pub fn new() -> Self {
        Self
    }

    /// 映射任意可描述的值
    pub fn map(&self, value: &dyn Describe) -> Plain {
        self.flatten(value.describe())
    }

    /// 值对象：单属性时折叠为标量，否则输出映射
    pub fn value_object_to_obj<P: Props>(&self, value_object: &ValueObject<P>) -> Plain {
        self.flatten(value_object.describe())
    }

    /// 实体：始终输出映射
    pub fn entity_to_obj<P: Props>(&self, entity: &Entity<P>) -> Plain {
        self.flatten(entity.describe())
    }

    /// 聚合：始终输出映射，嵌套实体同样完整展开
    pub fn aggregate_to_obj<P: Props>(&self, aggregate: &Aggregate<P>) -> Plain {
        self.flatten(aggregate.describe())
    }

    /// 按形态递归扁平化
    pub fn flatten(&self, shape: Shape<'_>) -> Plain {
        match shape {
            Shape::Value(plain) => plain,
            Shape::Date(date) => Plain::Date(date),
            Shape::Id(id) => Plain::String(id.value().to_string()),
            Shape::Sequence(items) => {
                Plain::List(items.into_iter().map(|s| self.flatten(s)).collect())
            }
            Shape::ValueObject(bag) => {
                let mut map = self.flatten_bag(bag);
                if map.len() == 1 {
                    if let Some((_, only)) = map.pop() {
                        return only;
                    }
                }
                Plain::Map(map)
            }
            Shape::Entity(bag) | Shape::Record(bag) => Plain::Map(self.flatten_bag(bag)),
        }
    }

    fn flatten_bag(&self, bag: Bag<'_>) -> IndexMap<String, Plain> {
        bag.into_iter()
            .map(|(key, shape)| (key.into_owned(), self.flatten(shape)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Id;
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use std::borrow::Cow;
    use std::collections::BTreeMap;

    #[test]
    fn single_key_value_object_collapses() {
        let shape = Shape::ValueObject(vec![(Cow::Borrowed("value"), "hello".describe())]);
        assert_eq!(AutoMapper::new().flatten(shape), Plain::from("hello"));
    }

    #[test]
    fn single_key_entity_does_not_collapse() {
        let id = Id::from("e-1");
        let shape = Shape::Entity(vec![(Cow::Borrowed("id"), id.describe())]);
        assert_eq!(
            AutoMapper::new().flatten(shape).to_json(),
            json!({ "id": "e-1" })
        );
    }

    #[test]
    fn sequences_keep_order_and_map_ids() {
        let ids = vec![
            Id::from("927be849b0b1"),
            Id::from("927be849b0b2"),
            Id::from("927be849b0b3"),
        ];
        assert_eq!(
            AutoMapper::new().map(&ids).to_json(),
            json!(["927be849b0b1", "927be849b0b2", "927be849b0b3"])
        );
    }

    #[test]
    fn mappings_keep_declared_order() {
        let shape = Shape::Record(vec![
            (Cow::Borrowed("zeta"), 1_i32.describe()),
            (Cow::Borrowed("alpha"), 2_i32.describe()),
            (Cow::Borrowed("mid"), 3_i32.describe()),
        ]);
        let plain = AutoMapper::new().flatten(shape);
        let keys: Vec<&str> = plain.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(
            serde_json::to_string(&plain).unwrap(),
            r#"{"zeta":1,"alpha":2,"mid":3}"#
        );
        assert_eq!(plain.to_json().to_string(), r#"{"zeta":1,"alpha":2,"mid":3}"#);
    }

    #[test]
    fn dates_are_terminal() {
        let date: DateTime<Utc> = "2022-01-01T03:00:00Z".parse().unwrap();
        assert_eq!(AutoMapper::new().map(&date), Plain::Date(date));
    }

    #[test]
    fn options_and_records() {
        let mut detail = BTreeMap::new();
        detail.insert("likes".to_string(), json!(200));
        detail.insert("summary".to_string(), json!(["page1", "page2"]));

        let mapper = AutoMapper::new();
        assert_eq!(
            mapper.map(&detail).to_json(),
            json!({ "likes": 200, "summary": ["page1", "page2"] })
        );
        assert!(mapper.map(&None::<String>).is_null());
        assert_eq!(mapper.map(&Some(3_u8)), Plain::from(3));
    }
}
