pub mod session_service;
pub mod api_client;
pub mod live_feed;
pub mod web_socket;

pub use session_service::SessionManager;
pub use api_client::{ApiClient, HttpMethod};
pub use live_feed::{FeedState, LiveFeed};
pub use web_socket::{page_feed_url, BrowserFeed, TimeoutScheduler, WebSocketConnector};
