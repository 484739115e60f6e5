use cucumber::World;
use til::config::BlogConfig;
use til::github::issues::Issue;
use til::render::Page;
use til::site::BuildReport;

#[derive(Debug, Default, World)]
pub struct TilWorld {
    pub config: Option<BlogConfig>,
    pub issues: Vec<Issue>,
    pub page: Option<Page>,
    pub out_dir: Option<tempfile::TempDir>,
    pub report: Option<BuildReport>,
    pub slug: String,
}

#[tokio::main]
async fn main() {
    TilWorld::cucumber().run_and_exit("features").await;
}

mod steps;
