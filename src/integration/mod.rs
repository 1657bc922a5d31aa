pub mod sendgrid_nkadime;
