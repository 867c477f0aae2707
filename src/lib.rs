pub mod decode;
pub mod fetch;
pub mod output;
pub mod paging;
pub mod platform;
pub mod platforms;
pub mod report;
pub mod summary;
pub mod window;
