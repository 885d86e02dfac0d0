pub mod category_service;
pub mod cloudinary_service;
pub mod media;
pub mod product_service;
pub mod storage_service;
