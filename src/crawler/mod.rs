pub mod fetcher;
pub mod html;
pub mod links;
pub mod web_crawler;
