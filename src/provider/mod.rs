pub use self::{
    http::{RetryPolicy, HTTP},
    upstream::Upstream,
};

mod http;
mod upstream;
