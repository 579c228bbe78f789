use quote::quote;
use refsync_build::generate_from_files;
use std::{env::var, error::Error, fs, path::PathBuf};

const FIXTURE: &str = "fixtures/store.json";
const ORDER: &str = "store::Order";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={FIXTURE}");

    let out_dir = PathBuf::from(var("OUT_DIR")?);
    let generated = generate_from_files(&PathBuf::from(FIXTURE), None)?;

    //
    // STRUCTS
    //
    // declared fields are written here; holders come from the generator
    //

    let holders = generated
        .field_decls
        .get(ORDER)
        .ok_or("no holder fields generated for store::Order")?;
    let order = quote! {
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct Order {
            pub id: ::std::option::Option<::refsync::types::ObjectId>,
            pub customer: ::std::option::Option<Customer>,
            pub co_signers: ::std::option::Option<::std::vec::Vec<Customer>>,
            pub placed: i64,
            pub draft: bool,
            #holders
        }
    };
    fs::write(out_dir.join("store.rs"), order.to_string())?;

    //
    // RELATIONS
    //

    fs::write(out_dir.join("relations.rs"), generated.source())?;

    Ok(())
}
