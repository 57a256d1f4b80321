use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="id">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>LetterLens - Ekstraksi Isi Surat</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem auto; max-width: 720px; color: #1d1d1f; }
    h1 { margin-bottom: 0.25rem; }
    .subtitle { color: #666; margin-bottom: 1.5rem; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    .dropzone { border: 2px dashed #aaa; border-radius: 8px; padding: 2rem; text-align: center; cursor: pointer; }
    .dropzone.dragover { border-color: #2563eb; background: #eff6ff; }
    .error { background: #fef2f2; border: 1px solid #fecaca; color: #991b1b; padding: 0.75rem; border-radius: 8px; margin-top: 0.75rem; }
    .field { margin-bottom: 0.75rem; }
    .field .label { font-size: 0.8rem; text-transform: uppercase; color: #64748b; }
    .field .value { font-size: 1rem; }
    .summary { background: #eff6ff; border: 1px solid #bfdbfe; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    .hidden { display: none; }
  </style>
</head>
<body>
  <h1>LetterLens</h1>
  <p class="subtitle">Upload surat dinas, undangan, atau dokumen resmi lainnya. AI akan merangkum dan mengekstrak data penting untuk Anda.</p>

  <div id="idle" class="card">
    <div id="dropzone" class="dropzone">
      <p><strong>Klik untuk upload</strong> atau tarik file ke sini</p>
      <p>JPG, PNG, WEBP, atau PDF (maks. 5MB)</p>
      <input id="fileInput" type="file" class="hidden" accept="image/jpeg,image/png,image/webp,application/pdf" />
    </div>
    <div id="inlineError" class="error hidden"></div>
  </div>

  <div id="analyzing" class="card hidden">
    <p><strong>Sedang Menganalisis Dokumen...</strong></p>
    <p>Mengekstrak nomor, tanggal, pengirim, dan inti surat.</p>
  </div>

  <div id="success" class="card hidden">
    <h2>Analisis Selesai</h2>
    <div class="summary">
      <div class="label">Inti Surat</div>
      <div id="intiSurat" class="value"></div>
    </div>
    <div class="field"><div class="label">Nomor Surat</div><div id="nomorSurat" class="value"></div></div>
    <div class="field"><div class="label">Hal / Perihal</div><div id="hal" class="value"></div></div>
    <div class="field"><div class="label">Tanggal Surat</div><div id="tanggal" class="value"></div></div>
    <div class="field"><div class="label">Pengirim</div><div id="pengirim" class="value"></div></div>
    <div class="field"><div class="label">Kepada / Tujuan</div><div id="kepada" class="value"></div></div>
    <div class="field"><div class="label">Waktu Acara / Tenggat</div><div id="waktuAcara" class="value"></div></div>
    <button id="resetSuccess">Analisis Surat Lain</button>
  </div>

  <div id="error" class="card hidden">
    <h2>Gagal Menganalisis</h2>
    <div id="errorMessage" class="error"></div>
    <button id="resetError">Coba Lagi</button>
  </div>

  <script>
    const sections = ['idle', 'analyzing', 'success', 'error'];
    const fields = ['nomorSurat', 'hal', 'pengirim', 'tanggal', 'kepada', 'intiSurat', 'waktuAcara'];
    const validTypes = ['image/jpeg', 'image/png', 'image/webp', 'application/pdf'];
    const maxBytes = 5 * 1024 * 1024;

    const dropzone = document.getElementById('dropzone');
    const fileInput = document.getElementById('fileInput');
    const inlineError = document.getElementById('inlineError');

    function show(status) {
      for (const id of sections) {
        document.getElementById(id).classList.toggle('hidden', id !== status);
      }
    }

    function reset() {
      fileInput.value = '';
      inlineError.classList.add('hidden');
      show('idle');
    }

    async function analyze(file) {
      inlineError.classList.add('hidden');
      if (!validTypes.includes(file.type)) {
        inlineError.textContent = 'Format file tidak didukung. Gunakan JPG, PNG, atau PDF.';
        inlineError.classList.remove('hidden');
        return;
      }
      if (file.size > maxBytes) {
        inlineError.textContent = 'Ukuran file terlalu besar. Maksimal 5MB.';
        inlineError.classList.remove('hidden');
        return;
      }

      show('analyzing');
      const formData = new FormData();
      formData.append('file', file);

      let state;
      try {
        const res = await fetch('/api/analyze', { method: 'POST', body: formData });
        state = await res.json();
      } catch (e) {
        state = { status: 'error', error: 'Terjadi kesalahan saat menganalisis surat. Silakan coba lagi.' };
      }

      if (state.status === 'success' && state.data) {
        for (const f of fields) {
          document.getElementById(f).textContent = state.data[f];
        }
        show('success');
      } else {
        document.getElementById('errorMessage').textContent =
          state.error || state.message || 'Terjadi kesalahan saat menganalisis surat. Silakan coba lagi.';
        show('error');
      }
    }

    dropzone.addEventListener('click', () => fileInput.click());
    fileInput.addEventListener('change', () => {
      if (fileInput.files.length) analyze(fileInput.files[0]);
    });
    dropzone.addEventListener('dragover', (e) => {
      e.preventDefault();
      dropzone.classList.add('dragover');
    });
    dropzone.addEventListener('dragleave', () => dropzone.classList.remove('dragover'));
    dropzone.addEventListener('drop', (e) => {
      e.preventDefault();
      dropzone.classList.remove('dragover');
      if (e.dataTransfer.files.length) analyze(e.dataTransfer.files[0]);
    });
    document.getElementById('resetSuccess').addEventListener('click', reset);
    document.getElementById('resetError').addEventListener('click', reset);
  </script>
</body>
</html>"#)
}
