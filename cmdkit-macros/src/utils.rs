use syn::{Attribute, Token, punctuated::Punctuated};

// 读取已有 derive 列表，按末段标识去重（Deserialize 与 serde::Deserialize 视为同一项）
fn existing_derive_keys(attrs: &[Attribute]) -> Vec<String> {
    let mut keys = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("derive")) {
        if let Ok(list) =
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
        {
            keys.extend(list.iter().filter_map(last_segment));
        }
    }
    keys
}

fn last_segment(p: &syn::Path) -> Option<String> {
    p.segments.last().map(|s| s.ident.to_string())
}

/// 为缺失的派生追加一条 `#[derive(...)]`，已存在的保持不动
pub(crate) fn ensure_derives(attrs: &mut Vec<Attribute>, required: &[syn::Path]) {
    let existing = existing_derive_keys(attrs);
    let missing: Vec<&syn::Path> = required
        .iter()
        .filter(|p| {
            last_segment(p)
                .map(|k| !existing.contains(&k))
                .unwrap_or(false)
        })
        .collect();

    if missing.is_empty() {
        return;
    }

    // derive 需位于其他属性（如 #[serde(...)]）之前
    attrs.insert(0, syn::parse_quote!(#[derive(#(#missing),*)]));
}
