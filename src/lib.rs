pub mod cli {
    pub mod parser;
}
pub mod config;
pub mod filter;
pub mod github {
    pub mod client;
    pub mod issues;
}
pub mod logging;
pub mod output;
pub mod render;
pub mod router;
pub mod run;
pub mod site;
pub mod slug;
pub mod storage;
pub mod whoami;
