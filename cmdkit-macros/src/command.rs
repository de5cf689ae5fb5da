use crate::utils::ensure_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, LitStr, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[command] 宏实现
/// - 仅支持具名字段结构体（参数以对象形式反序列化，空命令写作 `struct X {}`）
/// - 追加派生：Debug, serde::Deserialize
/// - 生成 `::cmdkit_application::command::Command` 实现
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as CommandAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let st = match &mut input {
        Item::Struct(st) => st,
        other => {
            return syn::Error::new(other.span(), "#[command] only on struct")
                .to_compile_error()
                .into();
        }
    };

    if !matches!(st.fields, syn::Fields::Named(_)) {
        return syn::Error::new(
            st.span(),
            "#[command] requires a braced struct, e.g. struct Increment {}",
        )
        .to_compile_error()
        .into();
    }

    let Some(name) = cfg.name else {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "missing command name, e.g. #[command(name = \"CounterCommand#increment\")]",
        )
        .to_compile_error()
        .into();
    };

    if name.value().trim().is_empty() {
        return syn::Error::new(name.span(), "command name must not be empty")
            .to_compile_error()
            .into();
    }

    ensure_derives(
        &mut st.attrs,
        &[syn::parse_quote!(Debug), syn::parse_quote!(serde::Deserialize)],
    );

    let prevent_default = cfg.prevent_default.unwrap_or(false);
    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let out = quote! {
        #st

        impl #impl_generics ::cmdkit_application::command::Command for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            const PREVENTS_DEFAULT: bool = #prevent_default;
        }
    };

    TokenStream::from(out)
}

// -------- parsing --------

struct CommandAttrConfig {
    name: Option<LitStr>,
    prevent_default: Option<bool>,
}

impl Parse for CommandAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self {
            name: None,
            prevent_default: None,
        };

        let elems: Punctuated<CommandAttrElem, Token![,]> = Punctuated::parse_terminated(input)?;

        for elem in elems {
            match elem {
                CommandAttrElem::Name(lit) => {
                    if cfg.name.is_some() {
                        return Err(syn::Error::new(lit.span(), "duplicate key 'name'"));
                    }
                    cfg.name = Some(lit);
                }
                CommandAttrElem::PreventDefault(span, b) => {
                    if cfg.prevent_default.is_some() {
                        return Err(syn::Error::new(span, "duplicate key 'prevent_default'"));
                    }
                    cfg.prevent_default = Some(b);
                }
            }
        }

        Ok(cfg)
    }
}

enum CommandAttrElem {
    Name(LitStr),
    PreventDefault(proc_macro2::Span, bool),
}

impl Parse for CommandAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key == "name" {
            let _eq: Token![=] = input.parse()?;
            let lit: LitStr = input.parse()?;
            Ok(Self::Name(lit))
        } else if key == "prevent_default" {
            // 支持 `prevent_default` 与 `prevent_default = true|false`
            if input.peek(Token![=]) {
                let _eq: Token![=] = input.parse()?;
                let lit: syn::LitBool = input.parse()?;
                Ok(Self::PreventDefault(key.span(), lit.value()))
            } else {
                Ok(Self::PreventDefault(key.span(), true))
            }
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'name' or 'prevent_default'",
            ))
        }
    }
}
