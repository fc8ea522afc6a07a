pub mod virtual_accounts;
