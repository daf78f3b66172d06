use async_trait::async_trait;
use ddd_kernel::{
    Aggregate, DomainError, DomainEvent, DomainResult, DuplicatePolicy, EventHandler,
    EventOptions, Plain, PriorityEventEmitter, Props, Reply, Validator, ValueObject,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Props)]
#[props(validate = Self::check)]
struct MoneyProps {
    amount: i64,
}

impl MoneyProps {
    fn check(&self, validator: &dyn Validator) -> DomainResult<()> {
        if !validator.number(self.amount as f64).is_between(-1.0, 1e12) {
            return Err(DomainError::invalid_props("Money", "amount must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Props)]
struct AccountProps {
    owner: String,
    balance: ValueObject<MoneyProps>,
}

fn money(amount: i64) -> DomainResult<ValueObject<MoneyProps>> {
    ValueObject::create(MoneyProps { amount })
}

/// 开户通知
struct AccountOpened;

#[async_trait]
impl EventHandler<AccountProps> for AccountOpened {
    async fn dispatch(&self, event: &DomainEvent<AccountProps>) -> anyhow::Result<()> {
        let balance = event.aggregate.get(AccountProps::BALANCE);
        tracing::info!(
            account = %event.aggregate.id(),
            balance = *balance.get(MoneyProps::AMOUNT),
            "account opened"
        );
        Ok(())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // 开户
    let mut account = Aggregate::create_with_id(
        AccountProps {
            owner: "Jane Doe".into(),
            balance: money(1000)?,
        },
        "acc-1",
    )?;
    account.add_event(AccountOpened, DuplicatePolicy::Replace)?;

    // 存款 / 取款
    account.change(AccountProps::BALANCE, money(1500)?);
    account.change(AccountProps::BALANCE, money(1300)?);
    tracing::info!(
        balance = *account.get(AccountProps::BALANCE).get(MoneyProps::AMOUNT),
        snapshots = account.history().count(),
        "account updated"
    );

    // 撤销最后一次取款
    account.history_mut().back();
    tracing::info!(
        balance = *account.get(AccountProps::BALANCE).get(MoneyProps::AMOUNT),
        "withdrawal undone"
    );

    // 分发开户事件（载荷为当前状态）
    let dispatched = account.dispatch_all().await?;
    tracing::info!(dispatched, "domain events dispatched");

    println!("{}", serde_json::to_string_pretty(&account.to_object())?);

    // 本地通知：低优先级数值先执行，结果按分发顺序收集
    let mut notices: PriorityEventEmitter<Plain, String> =
        PriorityEventEmitter::new(account.to_object());
    notices.add_event("audit", |state, args| {
        let owner = state["owner"].as_str().unwrap_or_default();
        format!("{} checked {owner}", args.descriptor.event_name)
    })?;
    notices.add_event("sms", |state, _| {
        format!("sms to {}", state["owner"].as_str().unwrap_or_default())
    })?;
    notices.add_event_with(
        "email",
        |_, args| {
            let extra = args.extra.clone();
            Reply::deferred(async move { format!("email sent with {extra:?}") })
        },
        EventOptions::builder().priority(1).build(),
    )?;
    if let Some(reply) = notices.dispatch_event("email", vec![json!({ "template": "welcome" })]) {
        let result = reply.await;
        tracing::info!(%result, "single notice");
    }
    let results = notices.dispatch_events().await;
    tracing::info!(?results, "notices collected");
    tracing::info!(
        dispatched = notices.metrics().total_dispatched(),
        pending = notices.metrics().total_events(),
        "notices done"
    );

    Ok(())
}
