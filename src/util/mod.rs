pub mod astro;
