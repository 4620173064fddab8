pub mod amex_pdf;
