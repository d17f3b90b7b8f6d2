mod arrays;
mod other;
mod primitives;
