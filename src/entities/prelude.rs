pub use super::decoded_vins::Entity as DecodedVins;
