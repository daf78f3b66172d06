use crate::attrs::{ContainerAttrs, FieldAttrs};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, LitStr, Result};

/// #[derive(Props)] 宏实现
/// - 仅支持非泛型的具名字段结构体
/// - 生成 `Props` 实现与每个字段的 `Field` 常量
pub(crate) fn expand(input: DeriveInput) -> Result<TokenStream> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "#[derive(Props)] does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "#[derive(Props)] only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                ident.span(),
                "#[derive(Props)] only supports structs",
            ));
        }
    };

    let container = ContainerAttrs::from_attrs(&input.attrs)?;
    let kind = container
        .kind
        .unwrap_or_else(|| LitStr::new(&default_kind(&ident.to_string()), ident.span()));

    let mut bag_entries = Vec::new();
    let mut consts = Vec::new();

    for field in fields {
        let attrs = FieldAttrs::from_attrs(&field.attrs)?;
        let Some(name) = field.ident.as_ref() else {
            continue;
        };
        let bare = name.to_string().trim_start_matches("r#").to_string();
        let key = attrs
            .rename
            .unwrap_or_else(|| LitStr::new(&bare, name.span()));
        let const_ident = format_ident!("{}", bare.to_uppercase(), span = name.span());
        let ty = &field.ty;
        let vis = &field.vis;

        if !attrs.skip {
            bag_entries.push(quote! {
                (
                    ::std::borrow::Cow::Borrowed(#key),
                    ::ddd_kernel::Describe::describe(&self.#name),
                )
            });
        }

        consts.push(quote! {
            #vis const #const_ident: ::ddd_kernel::Field<Self, #ty> = {
                fn get(props: &#ident) -> &#ty {
                    &props.#name
                }
                fn get_mut(props: &mut #ident) -> &mut #ty {
                    &mut props.#name
                }
                ::ddd_kernel::Field::new(#key, get, get_mut)
            };
        });
    }

    let validate = container.validate.map(|path| {
        quote! {
            fn validate(
                &self,
                validator: &dyn ::ddd_kernel::Validator,
            ) -> ::ddd_kernel::DomainResult<()> {
                #path(self, validator)
            }
        }
    });

    Ok(quote! {
        impl ::ddd_kernel::Props for #ident {
            const KIND: &'static str = #kind;

            fn attributes(&self) -> ::ddd_kernel::Bag<'_> {
                ::std::vec![#(#bag_entries),*]
            }

            #validate
        }

        impl #ident {
            #(#consts)*
        }
    })
}

// 结构体名去掉末尾的 Props，例如 UserProps -> User
fn default_kind(name: &str) -> String {
    match name.strip_suffix("Props") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}
