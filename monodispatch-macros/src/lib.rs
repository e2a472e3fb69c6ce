use proc_macro::TokenStream;
use quote::quote;
use syn::{
    DeriveInput, GenericParam, Ident, LitInt, LitStr, Token, Type, parenthesized,
    parse::{Parse, ParseStream},
    parse_macro_input, parse_quote,
    punctuated::Punctuated,
};

/// Derive macro for implementing the `Describe` trait.
///
/// ```rust,ignore
/// #[derive(Describe)]
/// #[describe(extends(dyn Bird, dyn Swimmer), exposes(quack = 0, swim = 1))]
/// struct Duck;
/// ```
///
/// `extends` lists direct supertypes left to right; `exposes` lists operations
/// with their arity. Operation names may be identifiers or string literals.
/// The attribute may be repeated; lists are concatenated in order.
#[proc_macro_derive(Describe, attributes(describe))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);

    let mut args = DescribeArgs::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("describe")) {
        match attr.parse_args::<DescribeArgs>() {
            Ok(parsed) => args.merge(parsed),
            Err(err) => return err.to_compile_error().into(),
        }
    }

    // Type identity needs `'static` parameters.
    let statics: Vec<_> = input
        .generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => Some(ty.ident.clone()),
            _ => None,
        })
        .collect();
    let where_clause = input.generics.make_where_clause();
    for ident in statics {
        where_clause.predicates.push(parse_quote!(#ident: 'static));
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let extends = args.extends.iter().map(|ty| {
        quote! { .extends::<#ty>() }
    });
    let exposes = args.exposes.iter().map(|(op, arity)| {
        quote! { .exposes(#op, #arity) }
    });

    let expanded = quote! {
        impl #impl_generics ::monodispatch::Describe for #name #ty_generics #where_clause {
            fn describe() -> ::monodispatch::TypeDecl {
                ::monodispatch::TypeDecl::of::<Self>()
                    #(#extends)*
                    #(#exposes)*
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct DescribeArgs {
    extends: Vec<Type>,
    exposes: Vec<(LitStr, usize)>,
}

impl DescribeArgs {
    fn merge(&mut self, other: DescribeArgs) {
        self.extends.extend(other.extends);
        self.exposes.extend(other.exposes);
    }
}

impl Parse for DescribeArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = DescribeArgs::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            let content;
            parenthesized!(content in input);

            match ident.to_string().as_str() {
                "extends" => {
                    let types = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                    args.extends.extend(types);
                }
                "exposes" => {
                    let ops = Punctuated::<Exposed, Token![,]>::parse_terminated(&content)?;
                    args.exposes.extend(ops.into_iter().map(|op| (op.name, op.arity)));
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown describe key: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

/// `name = arity`, with `name` an identifier or a string literal.
struct Exposed {
    name: LitStr,
    arity: usize,
}

impl Parse for Exposed {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = if input.peek(LitStr) {
            input.parse::<LitStr>()?
        } else {
            let ident: Ident = input.parse()?;
            LitStr::new(&ident.to_string(), ident.span())
        };
        input.parse::<Token![=]>()?;
        let arity: LitInt = input.parse()?;
        Ok(Exposed {
            name,
            arity: arity.base10_parse()?,
        })
    }
}
