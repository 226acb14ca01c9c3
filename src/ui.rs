use crate::models::ViewState;

pub fn render_index(view: &ViewState, clock: &str) -> String {
    let user = view.user.as_deref().unwrap_or("");
    let achievement = view.achievement.as_deref().unwrap_or("");
    let log: String = view
        .click_times
        .iter()
        .map(|entry| format!("<li>{}</li>", escape_html(entry)))
        .collect();

    INDEX_HTML
        .replace("{{THEME}}", view.theme.as_str())
        .replace("{{CLOCK}}", &escape_html(clock))
        .replace("{{USER}}", &escape_html(user))
        .replace("{{COUNT}}", &view.count.to_string())
        .replace("{{ACHIEVEMENT}}", &escape_html(achievement))
        .replace("{{LOG}}", &log)
        .replace("{{LOGIN_HIDDEN}}", if view.user.is_some() { "hidden" } else { "" })
        .replace("{{USER_HIDDEN}}", if view.user.is_some() { "" } else { "hidden" })
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" data-theme="{{THEME}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Click Counter</title>
  <style>
    :root {
      --bg: #ffffff;
      --ink: #222222;
      --muted: #6b645d;
      --card: #f6f4f1;
      --accent: #4caf50;
      --disabled: #aaaaaa;
      --achievement: #ff9800;
    }

    [data-theme="dark"] {
      --bg: #222222;
      --ink: #ffffff;
      --muted: #b9b3ac;
      --card: #2e2e2e;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      padding: 24px;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      transition: background 0.3s, color 0.3s;
    }

    .app {
      width: min(640px, 100%);
      display: grid;
      gap: 16px;
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      padding: 18px;
      display: grid;
      gap: 10px;
    }

    [hidden] {
      display: none !important;
    }

    button {
      border: none;
      border-radius: 8px;
      padding: 8px 14px;
      font-size: 1rem;
      cursor: pointer;
    }

    #click-btn {
      padding: 12px 24px;
      font-size: 1.2em;
      background: var(--accent);
      color: #fff;
      box-shadow: 0 2px 8px rgba(0, 0, 0, 0.15);
      transform: scale(1.03);
      transition: background 0.2s, box-shadow 0.2s;
    }

    #click-btn:disabled {
      background: var(--disabled);
      cursor: not-allowed;
      box-shadow: none;
      transform: scale(1);
    }

    .achievement {
      color: var(--achievement);
      min-height: 1.2em;
    }

    .label {
      color: var(--muted);
      font-weight: 600;
    }
  </style>
</head>
<body>
  <main class="app">
    <h2>Click Counter</h2>
    <div>
      <button id="theme-btn" type="button">Toggle theme</button>
    </div>
    <div>
      <span class="label">Current Time:</span> <span id="clock">{{CLOCK}}</span>
    </div>

    <section id="login" class="card" {{LOGIN_HIDDEN}}>
      <form id="login-form">
        <input id="name" type="text" placeholder="Enter your username" autocomplete="off" />
        <button type="submit">Login</button>
      </form>
    </section>

    <section id="user" class="card" {{USER_HIDDEN}}>
      <div>
        <span class="label">User:</span> <span id="username">{{USER}}</span>
        <button id="logout-btn" type="button">Logout</button>
      </div>
      <div>
        <button id="click-btn" type="button">Click me</button>
        <button id="reset-btn" type="button">Reset</button>
      </div>
      <div id="achievement" class="achievement">{{ACHIEVEMENT}}</div>
      <div><span class="label">Click count:</span> <span id="count">{{COUNT}}</span></div>
      <div>
        <span class="label">Click log:</span>
        <ul id="log">{{LOG}}</ul>
      </div>
    </section>
  </main>

  <audio id="cue" src="https://www.soundjay.com/buttons/sounds/button-16.mp3" preload="auto"></audio>

  <script>
    const rootEl = document.documentElement;
    const clockEl = document.getElementById('clock');
    const loginEl = document.getElementById('login');
    const userEl = document.getElementById('user');
    const nameEl = document.getElementById('name');
    const usernameEl = document.getElementById('username');
    const clickBtn = document.getElementById('click-btn');
    const themeBtn = document.getElementById('theme-btn');
    const achievementEl = document.getElementById('achievement');
    const countEl = document.getElementById('count');
    const logEl = document.getElementById('log');
    const cueEl = document.getElementById('cue');

    let cooldownPoll = null;

    const clockTimer = setInterval(() => {
      clockEl.textContent = new Date().toLocaleTimeString();
    }, 1000);

    const stopCooldownPoll = () => {
      if (cooldownPoll !== null) {
        clearInterval(cooldownPoll);
        cooldownPoll = null;
      }
    };

    const render = (view) => {
      rootEl.setAttribute('data-theme', view.theme);
      themeBtn.textContent = view.theme === 'light' ? 'Switch to Dark Mode' : 'Switch to Light Mode';

      const loggedIn = view.user !== null;
      loginEl.hidden = loggedIn;
      userEl.hidden = !loggedIn;
      usernameEl.textContent = view.user || '';
      achievementEl.textContent = view.achievement || '';
      countEl.textContent = view.count;
      logEl.replaceChildren(...view.click_times.map((entry) => {
        const li = document.createElement('li');
        li.textContent = entry;
        return li;
      }));

      clickBtn.disabled = view.disabled;
      clickBtn.textContent = view.disabled
        ? (view.seconds_remaining > 0 ? `Wait ${view.seconds_remaining}s` : 'Disabled')
        : 'Click me';

      if (view.disabled && cooldownPoll === null) {
        cooldownPoll = setInterval(() => {
          refresh().catch((err) => console.error(err));
        }, 1000);
      } else if (!view.disabled) {
        stopCooldownPoll();
      }
    };

    const request = async (method, url, body) => {
      const options = { method, headers: {} };
      if (body !== undefined) {
        options.headers['content-type'] = 'application/json';
        options.body = JSON.stringify(body);
      }
      const res = await fetch(url, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const refresh = async () => {
      render(await request('GET', '/api/state'));
    };

    const playCue = () => {
      try {
        cueEl.currentTime = 0;
        const playing = cueEl.play();
        if (playing) {
          playing.catch(() => {});
        }
      } catch (_) {
      }
    };

    const act = (promise) => promise.catch((err) => alert(err.message));

    document.getElementById('login-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const name = nameEl.value;
      if (!name) {
        return;
      }
      act(request('POST', '/api/login', { name }).then((view) => {
        nameEl.value = '';
        render(view);
      }));
    });

    document.getElementById('logout-btn').addEventListener('click', () => {
      act(request('POST', '/api/logout').then(render));
    });

    clickBtn.addEventListener('click', () => {
      act(request('POST', '/api/click').then((view) => {
        playCue();
        render(view);
        if (view.notice) {
          alert(view.notice);
        }
      }));
    });

    document.getElementById('reset-btn').addEventListener('click', () => {
      act(request('POST', '/api/reset').then(render));
    });

    themeBtn.addEventListener('click', () => {
      act(request('POST', '/api/theme').then(render));
    });

    window.addEventListener('pagehide', () => {
      clearInterval(clockTimer);
      stopCooldownPoll();
    });

    refresh().catch((err) => console.error(err));
  </script>
</body>
</html>
"#;
