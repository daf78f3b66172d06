use ddd_kernel::{DomainError, DomainResult, Plain, Props, Validator, ValueObject};

#[derive(Debug, Clone, PartialEq, Props)]
#[props(kind = "Money", validate = Self::check)]
struct AmountProps {
    #[props(rename = "amount")]
    value: i64,
    #[props(skip)]
    note: String,
}

impl AmountProps {
    fn check(&self, validator: &dyn Validator) -> DomainResult<()> {
        if !validator.number(self.value as f64).is_between(-1.0, 1_000_000.0) {
            return Err(DomainError::invalid_props("Money", "amount out of range"));
        }
        Ok(())
    }
}

fn main() {
    let money = ValueObject::create(AmountProps {
        value: 10,
        note: "ignored".into(),
    })
    .unwrap();
    assert_eq!(money.hash_code(), "[ValueObject@Money]");
    assert_eq!(AmountProps::VALUE.name(), "amount");
    assert_eq!(money.get(AmountProps::NOTE), "ignored");
    // 仅剩一个属性时折叠为标量
    assert_eq!(money.to_object(), Plain::from(10));

    assert!(
        ValueObject::create(AmountProps {
            value: -5,
            note: String::new(),
        })
        .is_err()
    );
}
