use ddd_kernel::{Aggregate, Id, Props, ValueObject};

#[derive(Debug, Clone, PartialEq, Props)]
pub struct NameProps {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Props)]
pub struct OrderProps {
    pub customer: ValueObject<NameProps>,
    pub lines: Vec<u32>,
    pub reference: Option<Id>,
    pub r#type: String,
}

fn main() {
    let mut order = Aggregate::create(OrderProps {
        customer: ValueObject::create(NameProps {
            value: "Jane".into(),
        })
        .unwrap(),
        lines: vec![1, 2],
        reference: Some(Id::from("ref-1")),
        r#type: "retail".into(),
    })
    .unwrap();

    order.set(OrderProps::LINES).to(vec![3]);
    assert_eq!(OrderProps::TYPE.name(), "type");

    let obj = order.to_object();
    assert_eq!(obj["customer"].as_str(), Some("Jane"));
    assert_eq!(obj["reference"].as_str(), Some("ref-1"));
    assert_eq!(obj["type"].as_str(), Some("retail"));
    assert_eq!(order.history().count(), 2);
}
