use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=assets/css/input.css");
    println!("cargo:rerun-if-changed=templates/");

    // Tailwind standalone CLI when installed, otherwise a hand-written stylesheet
    let status = Command::new("tailwindcss")
        .args([
            "-i",
            "assets/css/input.css",
            "-o",
            "assets/css/output.css",
            "--minify",
        ])
        .status();

    match status {
        Ok(s) if s.success() => {
            println!("cargo:warning=Tailwind CSS compiled successfully");
        }
        _ => {
            println!("cargo:warning=Tailwind CLI not found, using fallback CSS");
            std::fs::create_dir_all("assets/css").ok();
            std::fs::write("assets/css/output.css", FALLBACK_CSS).ok();
        }
    }
}

const FALLBACK_CSS: &str = r#"*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: Georgia, "Iowan Old Style", serif; line-height: 1.6; color: #1c1917; background: #fafaf9; -webkit-font-smoothing: antialiased; }
h1, h2, h3, nav, label, button, .btn, .tabs { font-family: system-ui, -apple-system, sans-serif; }
.min-h-screen { min-height: 100vh; }
.mx-auto { margin-left: auto; margin-right: auto; }
.max-w-5xl { max-width: 64rem; }
.max-w-3xl { max-width: 48rem; }
.max-w-md { max-width: 28rem; }
.w-full { width: 100%; }
.px-4 { padding-left: 1rem; padding-right: 1rem; }
.py-3 { padding-top: 0.75rem; padding-bottom: 0.75rem; }
.py-6 { padding-top: 1.5rem; padding-bottom: 1.5rem; }
.py-8 { padding-top: 2rem; padding-bottom: 2rem; }
.py-16 { padding-top: 4rem; padding-bottom: 4rem; }
.p-4 { padding: 1rem; }
.mb-2 { margin-bottom: 0.5rem; }
.mb-4 { margin-bottom: 1rem; }
.mb-8 { margin-bottom: 2rem; }
.mt-4 { margin-top: 1rem; }
.flex { display: flex; }
.items-center { align-items: center; }
.justify-center { justify-content: center; }
.justify-between { justify-content: space-between; }
.gap-2 { gap: 0.5rem; }
.gap-3 { gap: 0.75rem; }
.gap-4 { gap: 1rem; }
.grid { display: grid; gap: 1.5rem; }
.grid-2 { grid-template-columns: repeat(auto-fill, minmax(22rem, 1fr)); }
.grid-3 { grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); }
.text-center { text-align: center; }
.text-xs { font-size: 0.75rem; }
.text-sm { font-size: 0.875rem; }
.text-lg { font-size: 1.125rem; }
.text-xl { font-size: 1.25rem; }
.text-4xl { font-size: 2.25rem; line-height: 1.2; }
.font-medium { font-weight: 500; }
.font-semibold { font-weight: 600; }
.font-bold { font-weight: 700; }
.text-stone-500 { color: #78716c; }
.text-stone-600 { color: #57534e; }
.text-stone-700 { color: #44403c; }
.bg-white { background-color: #fff; }
.bg-stone-50 { background-color: #fafaf9; }
.border-b { border-bottom: 1px solid; }
.border-t { border-top: 1px solid; }
.border-stone-200 { border-color: #e7e5e4; }
.whitespace-pre-wrap { white-space: pre-wrap; }
a { color: inherit; text-decoration: none; }
a:hover { opacity: 0.8; }
.btn { display: inline-flex; align-items: center; justify-content: center; padding: 0.5rem 1rem; border-radius: 0.5rem; font-size: 0.875rem; font-weight: 500; cursor: pointer; transition: all 0.15s; }
.btn-primary { background: #1c1917; color: #fff; border: none; }
.btn-primary:hover { background: #44403c; }
.btn-secondary { background: #fff; color: #1c1917; border: 1px solid #d6d3d1; }
.btn-secondary:hover { background: #f5f5f4; }
.btn-liked { background: #fff1f2; color: #e11d48; border: 1px solid #fecdd3; }
.btn-danger { background: #fff; color: #dc2626; border: 1px solid #fca5a5; }
.btn-danger:hover { background: #fef2f2; }
.card { background: #fff; border-radius: 0.75rem; border: 1px solid #e7e5e4; padding: 1.5rem; box-shadow: 0 1px 2px 0 rgb(0 0 0 / 0.05); }
.card-post { padding: 0; overflow: hidden; }
.cover { display: block; width: 100%; height: 12rem; object-fit: cover; background: #e7e5e4; }
.cover-lg { height: 24rem; border-radius: 0.75rem; }
.badge { font-size: 0.75rem; font-weight: 600; padding: 0.125rem 0.5rem; border-radius: 9999px; background: #1c1917; color: #fff; }
.tag { font-size: 0.75rem; color: #78716c; }
.hero { padding: 3rem 0 1rem; }
.tabs { display: flex; gap: 0.25rem; background: #f5f5f4; padding: 0.25rem; border-radius: 0.5rem; }
.tab { font-size: 0.875rem; padding: 0.25rem 0.75rem; border-radius: 0.375rem; color: #57534e; }
.tab-active { background: #fff; color: #1c1917; box-shadow: 0 1px 2px 0 rgb(0 0 0 / 0.08); }
.prose { font-size: 1.125rem; line-height: 1.8; }
.label { display: block; font-size: 0.875rem; font-weight: 500; margin-bottom: 0.25rem; }
.input { display: block; width: 100%; padding: 0.5rem 0.75rem; border: 1px solid #d6d3d1; border-radius: 0.5rem; font: inherit; background: #fff; }
.input:focus { outline: 2px solid #1c1917; outline-offset: 1px; }
.comments { list-style: none; display: flex; flex-direction: column; gap: 1rem; }
.comment { background: #fff; border: 1px solid #e7e5e4; border-radius: 0.5rem; padding: 1rem; }
.flash { margin-top: 1rem; padding: 0.75rem 1rem; border-radius: 0.5rem; font-size: 0.875rem; font-family: system-ui, sans-serif; }
.flash-success { background: #f0fdf4; color: #166534; border: 1px solid #bbf7d0; }
.flash-error { background: #fef2f2; color: #991b1b; border: 1px solid #fecaca; }
"#;
