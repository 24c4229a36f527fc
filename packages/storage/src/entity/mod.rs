pub mod stored_asset;
