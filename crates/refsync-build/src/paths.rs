use crate::BuildError;
use proc_macro2::TokenStream;
use quote::quote;
use refsync_config::ResolverConfig;
use syn::Path;

pub const RUNTIME_CRATE_ENV: &str = "REFSYNC_RUNTIME_CRATE";

fn env_path(name: &str) -> Option<TokenStream> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .and_then(|value| syn::parse_str::<Path>(&value).ok())
        .map(|path| quote!(#path))
}

///
/// CratePaths
///
/// Resolves the runtime crate root named by generated code. The configured
/// `runtime_crate` is used unless `REFSYNC_RUNTIME_CRATE` holds a valid path.
///

#[derive(Clone, Debug)]
pub struct CratePaths {
    pub runtime: TokenStream,
}

impl CratePaths {
    pub fn new(config: &ResolverConfig) -> Result<Self, BuildError> {
        let runtime = match env_path(RUNTIME_CRATE_ENV) {
            Some(path) => path,
            None => Self::parse(&config.runtime_crate)?,
        };

        Ok(Self { runtime })
    }

    /// Paths from an explicit runtime crate path, ignoring the environment.
    pub fn with_runtime(runtime: &str) -> Result<Self, BuildError> {
        Ok(Self {
            runtime: Self::parse(runtime)?,
        })
    }

    fn parse(path: &str) -> Result<TokenStream, BuildError> {
        let path = syn::parse_str::<Path>(path.trim())
            .map_err(|_| BuildError::InvalidPath(path.to_string()))?;

        Ok(quote!(#path))
    }
}
