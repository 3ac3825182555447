pub mod checkout_check;
