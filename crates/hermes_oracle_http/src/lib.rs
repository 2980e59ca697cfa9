pub mod http_oracle;
mod responses;
