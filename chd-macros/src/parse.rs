use chd::Settings;
use proc_macro2::{TokenStream, TokenTree};
use syn::{
    parse::{Parse, ParseStream, Result},
    punctuated::Punctuated,
    Error, Ident, LitBool, LitInt, LitStr, Token,
};

/// `crate $path;`, inserted by the `macro_rules!` wrapper in `chd`.
#[derive(Debug)]
pub struct CratePath(pub Option<TokenStream>);

impl Parse for CratePath {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        if input.parse::<Token![crate]>().is_err() {
            return Ok(Self(None));
        }
        // `$crate` is not a valid path segment for syn, so collect raw tokens
        let mut path = TokenStream::new();
        while !input.peek(Token![;]) {
            path.extend([input.parse::<TokenTree>()?]);
        }
        input.parse::<Token![;]>()?;
        Ok(Self(Some(path)))
    }
}

/// Settings given as `name = literal;` before the keys.
#[derive(Debug)]
pub struct Context {
    pub settings: Settings,
}

impl Parse for Context {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut settings = Settings::new();
        while input.peek(Ident) && input.peek2(Token![=]) {
            let name = input.parse::<Ident>()?;
            input.parse::<Token![=]>()?;
            settings = match name.to_string().as_str() {
                "seed" => settings.with_seed(parse_u32(input)?),
                "alpha" => settings.with_alpha(parse_u32(input)?),
                "items_per_bucket" => settings.with_items_per_bucket(parse_u32(input)?),
                "displacement_limit" => settings.with_displacement_limit(parse_u32(input)?),
                "division_mode" => settings.with_division_mode(input.parse::<LitBool>()?.value),
                _ => {
                    return Err(Error::new(
                        name.span(),
                        "unknown setting\nexpected one of: `seed`, `alpha`, `items_per_bucket`, \
                         `division_mode`, `displacement_limit`",
                    ))
                }
            };
            input.parse::<Token![;]>()?;
        }
        Ok(Self { settings })
    }
}

/// Parse an integer literal that fits in `u32`.
fn parse_u32(input: ParseStream<'_>) -> Result<u32> {
    input.parse::<LitInt>()?.base10_parse()
}

type Comma = Token![,];

/// The complete `phf!` input.
#[derive(Debug)]
pub struct PhfInput {
    pub crate_path: CratePath,
    pub context: Context,
    // Using `Token![,]` directly here leads to "`derive` cannot be used on items with type macros".
    pub keys: Punctuated<LitStr, Comma>,
}

impl Parse for PhfInput {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        Ok(Self {
            crate_path: input.parse()?,
            context: input.parse()?,
            keys: Punctuated::parse_terminated(input)?,
        })
    }
}
