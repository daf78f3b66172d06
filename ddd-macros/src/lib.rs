use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod props;

/// 属性袋派生宏
/// - 为具名字段结构体实现 `::ddd_kernel::Props`（`KIND` / `attributes` / 可选 `validate`）
/// - 为每个字段生成同可见性的类型化属性键常量，例如 `age` -> `Self::AGE`
/// - 容器参数：`#[props(kind = "User", validate = Self::check)]`
///   - `kind` 默认取结构体名并去掉末尾的 `Props`
///   - `validate` 为 `fn(&Self, &dyn Validator) -> DomainResult<()>` 路径
/// - 字段参数：`#[props(rename = "key")]` 指定属性键名，`#[props(skip)]` 不参与自我描述
#[proc_macro_derive(Props, attributes(props))]
pub fn derive_props(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    props::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
