use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Ident, LitStr, Path, Result, Token, parse::Parse, parse::ParseStream};

/// 容器参数：`#[props(kind = "...", validate = path)]`
#[derive(Default)]
pub(crate) struct ContainerAttrs {
    pub(crate) kind: Option<LitStr>,
    pub(crate) validate: Option<Path>,
}

/// 字段参数：`#[props(rename = "...")]`、`#[props(skip)]`
#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub(crate) rename: Option<LitStr>,
    pub(crate) skip: bool,
}

impl ContainerAttrs {
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut out = Self::default();
        for kv in props_args(attrs)? {
            match kv.key.to_string().as_str() {
                "kind" => {
                    reject_duplicate(&kv.key, out.kind.is_some())?;
                    out.kind = Some(kv.str_value("kind")?);
                }
                "validate" => {
                    reject_duplicate(&kv.key, out.validate.is_some())?;
                    out.validate = Some(kv.path_value("validate")?);
                }
                _ => {
                    return Err(syn::Error::new(
                        kv.key.span(),
                        "unknown key; expected 'kind' | 'validate'",
                    ));
                }
            }
        }
        Ok(out)
    }
}

impl FieldAttrs {
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut out = Self::default();
        for kv in props_args(attrs)? {
            match kv.key.to_string().as_str() {
                "rename" => {
                    reject_duplicate(&kv.key, out.rename.is_some())?;
                    out.rename = Some(kv.str_value("rename")?);
                }
                "skip" => {
                    reject_duplicate(&kv.key, out.skip)?;
                    if let Some(value) = kv.value {
                        return Err(syn::Error::new(value.span(), "'skip' takes no value"));
                    }
                    out.skip = true;
                }
                _ => {
                    return Err(syn::Error::new(
                        kv.key.span(),
                        "unknown key; expected 'rename' | 'skip'",
                    ));
                }
            }
        }
        Ok(out)
    }
}

fn reject_duplicate(key: &Ident, seen: bool) -> Result<()> {
    if seen {
        return Err(syn::Error::new(
            key.span(),
            format!("duplicate key '{key}' in attribute"),
        ));
    }
    Ok(())
}

// 收集所有 #[props(...)] 中的键值对
fn props_args(attrs: &[Attribute]) -> Result<Vec<KeyValue>> {
    let mut out = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("props")) {
        let pairs = attr.parse_args_with(Punctuated::<KeyValue, Token![,]>::parse_terminated)?;
        out.extend(pairs);
    }
    Ok(out)
}

// key 或 key = expr
struct KeyValue {
    key: Ident,
    value: Option<Expr>,
}

impl KeyValue {
    fn str_value(self, key: &str) -> Result<LitStr> {
        match self.value {
            Some(Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            })) => Ok(lit),
            Some(other) => Err(syn::Error::new(
                other.span(),
                format!("expected string literal for '{key}'"),
            )),
            None => Err(syn::Error::new(
                self.key.span(),
                format!("expected '{key} = \"...\"'"),
            )),
        }
    }

    fn path_value(self, key: &str) -> Result<Path> {
        match self.value {
            Some(Expr::Path(p)) => Ok(p.path),
            Some(other) => Err(syn::Error::new(
                other.span(),
                format!("expected a function path for '{key}'"),
            )),
            None => Err(syn::Error::new(
                self.key.span(),
                format!("expected '{key} = path::to::fn'"),
            )),
        }
    }
}

impl Parse for KeyValue {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let value = if input.peek(Token![=]) {
            let _eq: Token![=] = input.parse()?;
            Some(input.parse()?)
        } else {
            None
        };
        Ok(Self { key, value })
    }
}
